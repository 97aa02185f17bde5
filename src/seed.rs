// 🌱 Seed Dataset - Reference countries, companies and posts
//
// The static collections the data store serves when nothing else is loaded.

use crate::model::{Company, Country, EmissionRecord, Post};

pub fn countries() -> Vec<Country> {
    vec![
        Country::new("US", "United States", Some("🇺🇸")),
        Country::new("DE", "Germany", Some("🇩🇪")),
        Country::new("JP", "Japan", Some("🇯🇵")),
        Country::new("KR", "South Korea", Some("🇰🇷")),
        Country::new("GB", "United Kingdom", Some("🇬🇧")),
    ]
}

pub fn companies() -> Vec<Company> {
    vec![
        Company::new(
            "c1",
            "Acme Corp",
            "US",
            vec![
                EmissionRecord::new("2024-01", "gasoline", 120.0),
                EmissionRecord::new("2024-02", "gasoline", 110.0),
                EmissionRecord::new("2024-03", "gasoline", 95.0),
                EmissionRecord::new("2024-04", "gasoline", 105.0),
                EmissionRecord::new("2024-05", "gasoline", 88.0),
                EmissionRecord::new("2024-06", "gasoline", 92.0),
                EmissionRecord::new("2024-01", "diesel", 80.0),
                EmissionRecord::new("2024-02", "diesel", 75.0),
                EmissionRecord::new("2024-03", "diesel", 70.0),
            ],
        ),
        Company::new(
            "c2",
            "Globex Industries",
            "DE",
            vec![
                EmissionRecord::new("2024-01", "gasoline", 80.0),
                EmissionRecord::new("2024-02", "gasoline", 105.0),
                EmissionRecord::new("2024-03", "gasoline", 120.0),
                EmissionRecord::new("2024-04", "gasoline", 115.0),
                EmissionRecord::new("2024-05", "gasoline", 125.0),
                EmissionRecord::new("2024-06", "gasoline", 135.0),
                EmissionRecord::new("2024-01", "lpg", 60.0),
                EmissionRecord::new("2024-02", "lpg", 65.0),
                EmissionRecord::new("2024-03", "lpg", 55.0),
            ],
        ),
        Company::new(
            "c3",
            "TechNova Solutions",
            "JP",
            vec![
                EmissionRecord::new("2024-01", "electricity", 200.0),
                EmissionRecord::new("2024-02", "electricity", 195.0),
                EmissionRecord::new("2024-03", "electricity", 180.0),
                EmissionRecord::new("2024-04", "electricity", 175.0),
                EmissionRecord::new("2024-05", "electricity", 160.0),
                EmissionRecord::new("2024-06", "electricity", 150.0),
            ],
        ),
    ]
}

pub fn posts() -> Vec<Post> {
    vec![
        Post {
            id: "p1".to_string(),
            title: "2024 Q1 Sustainability Report".to_string(),
            resource_uid: "c1".to_string(),
            date_time: "2024-03".to_string(),
            content: "Q1 CO2 emissions fell 15% year over year.".to_string(),
        },
        Post {
            id: "p2".to_string(),
            title: "New Environmental Policy".to_string(),
            resource_uid: "c2".to_string(),
            date_time: "2024-02".to_string(),
            content: "Adopted a new policy toward the carbon-neutrality goal.".to_string(),
        },
    ]
}

//! Demo data for the in-memory backend

use chrono::{Duration, Utc};

use catchu_core::domain::entities::{CurrentUser, Post, PostId, UserId, UserProfile};

const BRANDS: [&str; 5] = ["Hermes", "Chanel", "Louis Vuitton", "Dior", "Celine"];
const CATEGORIES: [&str; 4] = ["Bags", "Shoes", "Jewelry", "Ready-to-wear"];
const AUTHORS: [(&str, &str); 3] = [("demo-1", "Mina"), ("demo-2", "Joon"), ("demo-3", "Ari")];

/// User signed in when none is configured
pub fn demo_user() -> CurrentUser {
    CurrentUser::new(AUTHORS[0].0).with_display_name(AUTHORS[0].1)
}

pub fn demo_profile() -> UserProfile {
    UserProfile {
        display_name: AUTHORS[0].1.to_string(),
        email: "mina@example.com".to_string(),
        preferred_brands: vec!["Hermes".to_string(), "Celine".to_string()],
        created_at: Some(Utc::now() - Duration::days(90)),
        updated_at: None,
    }
}

/// `count` posts, one every 17 minutes going back from now
pub fn demo_posts(count: usize) -> Vec<Post> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let brand = BRANDS[i % BRANDS.len()];
            let category = CATEGORIES[(i / 2) % CATEGORIES.len()];
            let (author_id, author_name) = AUTHORS[i % AUTHORS.len()];
            Post {
                id: PostId::new(format!("demo-{:03}", i)),
                title: format!("{} {} find #{}", brand, category.to_lowercase(), i + 1),
                brand: brand.to_string(),
                category: category.to_string(),
                content: "Spotted this today. Thoughts?".to_string(),
                tags: vec![brand.to_lowercase().replace(' ', "")],
                image_urls: vec![format!("memory://posts/{}/{}-0.jpg", author_id, i)],
                author_id: UserId::from(author_id),
                author_name: Some(author_name.to_string()),
                like_count: ((i * 7) % 23) as u32,
                created_at: Some(now - Duration::minutes(17 * i as i64)),
            }
        })
        .collect()
}

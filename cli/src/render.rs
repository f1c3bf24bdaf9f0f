//! Feed renderer
//!
//! Renders the feed and posts as plain text for the terminal.

use catchu_core::app::FeedState;
use catchu_core::domain::entities::{Comment, Post, UserProfile};
use catchu_core::{ErrorKind, FeedError};

/// Render the visible feed with its status line
pub fn render_feed(state: &FeedState) -> String {
    let mut buf = String::new();

    buf.push_str("=== Catchu feed ===\n");

    let filters = state.filters();
    if filters.is_active() {
        buf.push_str("Filters:");
        if let Some(brand) = &filters.brand {
            buf.push_str(&format!(" brand={}", brand));
        }
        if let Some(category) = &filters.category {
            buf.push_str(&format!(" category={}", category));
        }
        buf.push('\n');
    }

    if let Some(error) = state.error() {
        buf.push_str(&render_error(error));
        buf.push('\n');
    }

    let visible = state.visible();
    if state.is_loading_initial() {
        buf.push_str("Loading...\n");
    } else if visible.is_empty() {
        if filters.is_active() {
            buf.push_str("_No posts match the filters._\n");
        } else {
            buf.push_str("_No posts yet._\n");
        }
    }

    for (i, post) in visible.iter().enumerate() {
        buf.push_str(&format!("{:>3}. {}\n", i + 1, render_post_line(post)));
    }

    buf.push_str("---\n");
    if state.is_fetching_more() {
        buf.push_str("Loading more...\n");
    } else if state.has_more() {
        buf.push_str("Type `more` for older posts.\n");
    } else if !visible.is_empty() {
        buf.push_str("You're all caught up.\n");
    }

    buf
}

fn render_post_line(post: &Post) -> String {
    format!(
        "[{} / {}] {} by {} ({} likes) #{}",
        post.brand,
        post.category,
        post.title,
        post.author_name.as_deref().unwrap_or("anonymous"),
        post.like_count,
        post.id
    )
}

pub fn render_error(error: &FeedError) -> String {
    let remedy = match error.kind {
        ErrorKind::Unauthorized => "sign in and `refresh`",
        ErrorKind::Transient => "try again",
    };
    format!("! {} ({})", error.message, remedy)
}

/// Render a full post with its comment thread
pub fn render_post(post: &Post, comments: &[Comment]) -> String {
    let mut buf = String::new();

    buf.push_str(&format!("# {}\n", post.title));
    buf.push_str(&format!("{} / {}", post.brand, post.category));
    if let Some(created) = post.created_at {
        buf.push_str(&format!(" - {}", created.format("%Y-%m-%d %H:%M")));
    }
    buf.push('\n');
    buf.push_str(&format!(
        "by {} - {} likes\n\n",
        post.author_name.as_deref().unwrap_or("anonymous"),
        post.like_count
    ));
    buf.push_str(&post.content);
    buf.push('\n');

    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{}", t)).collect();
        buf.push_str(&format!("\n{}\n", tags.join(" ")));
    }
    for url in &post.image_urls {
        buf.push_str(&format!("[image] {}\n", url));
    }

    buf.push_str(&format!("\n## Comments ({})\n", comments.len()));
    if comments.is_empty() {
        buf.push_str("_No comments yet._\n");
    }
    for comment in comments {
        buf.push_str(&format!(
            "- {} [{}]: {}\n",
            comment.author_name.as_deref().unwrap_or("anonymous"),
            comment.tone_tag,
            comment.content
        ));
    }

    buf
}

pub fn render_profile(profile: &UserProfile) -> String {
    let mut buf = String::new();
    buf.push_str("# Profile\n");
    let name = if profile.display_name.is_empty() {
        "(no name)"
    } else {
        profile.display_name.as_str()
    };
    buf.push_str(&format!("Name: {}\n", name));
    if !profile.email.is_empty() {
        buf.push_str(&format!("Email: {}\n", profile.email));
    }
    if !profile.preferred_brands.is_empty() {
        buf.push_str(&format!(
            "Favorite brands: {}\n",
            profile.preferred_brands.join(", ")
        ));
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use catchu_core::domain::entities::{CommentId, PostId, UserId};
    use catchu_core::domain::ports::PostsSnapshot;
    use catchu_core::error::ErrorSource;

    fn post(id: &str) -> Post {
        Post {
            id: PostId::from(id),
            title: "Kelly 28".to_string(),
            brand: "Hermes".to_string(),
            category: "Bags".to_string(),
            content: "Retail or resale?".to_string(),
            tags: vec!["kelly".to_string()],
            image_urls: vec!["https://img/1.jpg".to_string()],
            author_id: UserId::from("u1"),
            author_name: Some("Mina".to_string()),
            like_count: 4,
            created_at: None,
        }
    }

    #[test]
    fn test_render_loading_feed() {
        let state = FeedState::new(20);
        let output = render_feed(&state);
        assert!(output.contains("Loading..."));
        assert!(!output.contains("_No posts yet._"));
    }

    #[test]
    fn test_render_empty_feed() {
        let mut state = FeedState::new(20);
        let generation = state.begin_subscription();
        state.apply_snapshot(
            generation,
            PostsSnapshot {
                posts: Vec::new(),
                cursor: None,
            },
        );

        let output = render_feed(&state);

        assert!(output.contains("_No posts yet._"));
        assert!(!output.contains("Loading..."));
    }

    #[test]
    fn test_render_post_line() {
        let line = render_post_line(&post("p1"));
        assert_eq!(line, "[Hermes / Bags] Kelly 28 by Mina (4 likes) #p1");
    }

    #[test]
    fn test_render_post_with_comments() {
        let comments = vec![Comment {
            id: CommentId::from("c1"),
            content: "Resale for sure".to_string(),
            tone_tag: "agree".to_string(),
            author_id: UserId::from("u2"),
            author_name: None,
            created_at: None,
        }];

        let output = render_post(&post("p1"), &comments);

        assert!(output.starts_with("# Kelly 28\n"));
        assert!(output.contains("#kelly"));
        assert!(output.contains("## Comments (1)"));
        assert!(output.contains("- anonymous [agree]: Resale for sure"));
    }

    #[test]
    fn test_render_error_remedy() {
        let error = FeedError {
            kind: ErrorKind::Unauthorized,
            origin: ErrorSource::Subscription,
            message: "Not allowed".to_string(),
        };
        assert_eq!(render_error(&error), "! Not allowed (sign in and `refresh`)");
    }

    #[test]
    fn test_render_profile_defaults() {
        let output = render_profile(&UserProfile::default());
        assert!(output.contains("Name: (no name)"));
        assert!(!output.contains("Email"));
    }
}

//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::{TimeZone, Utc};

use crate::domain::entities::{
    CurrentUser, NewComment, NewPost, NewPostForm, Post, PostId, UserId,
};
use crate::domain::ports::{Cursor, PostsPage, PostsSnapshot};

/// Create a test post with default values
pub fn test_post(id: &str) -> Post {
    Post {
        id: PostId::from(id),
        title: format!("Post {}", id),
        brand: "Hermes".to_string(),
        category: "Bags".to_string(),
        content: "Worth the wait?".to_string(),
        tags: vec!["review".to_string()],
        image_urls: vec![format!("https://img.test/{}.jpg", id)],
        author_id: UserId::from("author-1"),
        author_name: Some("Author".to_string()),
        like_count: 0,
        created_at: Some(Utc::now()),
    }
}

/// Create a test post with a specific brand and category
pub fn test_post_with(id: &str, brand: &str, category: &str) -> Post {
    Post {
        brand: brand.to_string(),
        category: category.to_string(),
        ..test_post(id)
    }
}

/// Create a test post created `seconds` after the epoch
pub fn test_post_at(id: &str, seconds: i64) -> Post {
    Post {
        created_at: Utc.timestamp_opt(seconds, 0).single(),
        ..test_post(id)
    }
}

/// Create a test post owned by `author`
pub fn test_post_by(id: &str, author: &CurrentUser) -> Post {
    Post {
        author_id: author.id.clone(),
        author_name: author.display_name.clone(),
        ..test_post(id)
    }
}

pub fn test_new_post() -> NewPost {
    NewPost {
        title: "Fresh drop".to_string(),
        brand: "Chanel".to_string(),
        category: "Shoes".to_string(),
        content: "Just landed".to_string(),
        tags: Vec::new(),
        image_urls: vec!["memory://posts/u/1-0.jpg".to_string()],
        author_id: UserId::from("author-1"),
        author_name: None,
    }
}

/// A post form that passes validation, with `images` one-byte images
pub fn test_post_form(images: usize) -> NewPostForm {
    NewPostForm {
        title: "  Birkin 25 unboxing  ".to_string(),
        brand: "Hermes".to_string(),
        category: "Bags".to_string(),
        content: " Finally here \n".to_string(),
        tags: vec!["unboxing".to_string()],
        images: (0..images).map(|i| vec![i as u8 + 1]).collect(),
    }
}

pub fn test_new_comment(content: &str) -> NewComment {
    NewComment {
        content: content.to_string(),
        tone_tag: "agree".to_string(),
        author_id: UserId::from("commenter-1"),
        author_name: Some("Commenter".to_string()),
    }
}

/// The signed-in user used across tests
pub fn test_user() -> CurrentUser {
    CurrentUser::new("user-1").with_display_name("Mina")
}

/// Another user, for ownership checks
pub fn other_user() -> CurrentUser {
    CurrentUser::new("user-2").with_display_name("Joon")
}

fn cursor_after(posts: &[Post]) -> Option<Cursor> {
    posts.last().map(|p| Cursor::from_token(p.id.as_str()))
}

/// A live window of the given ids; the cursor names the last id
pub fn snapshot(ids: &[&str]) -> PostsSnapshot {
    let posts: Vec<Post> = ids.iter().map(|id| test_post(id)).collect();
    PostsSnapshot {
        cursor: cursor_after(&posts),
        posts,
    }
}

/// A historical page of the given ids; the cursor names the last id
pub fn page(ids: &[&str]) -> PostsPage {
    let posts: Vec<Post> = ids.iter().map(|id| test_post(id)).collect();
    PostsPage {
        cursor: cursor_after(&posts),
        posts,
    }
}

//! List site content

use anyhow::Result;

use crate::helpers;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let store = site.store();

    match content_type {
        "post" | "posts" => {
            let posts = store.all_posts();
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    helpers::display_date(&post.date),
                    post.title,
                    post.slug
                );
            }
        }
        "category" | "categories" => {
            let categories = store.all_categories();
            println!("Categories ({}):", categories.len());
            for category in categories {
                println!(
                    "  {} ({}) - {} 篇文章",
                    category.name,
                    category.slug,
                    store.posts_by_category(&category.id).len()
                );
            }
        }
        "tag" | "tags" => {
            let tags = store.all_tags();
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({})", tag.name, tag.post_count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, categories, tags",
                content_type
            );
        }
    }

    Ok(())
}

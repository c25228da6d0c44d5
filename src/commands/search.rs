//! Search posts from the command line

use anyhow::Result;

use crate::helpers;
use crate::query::{self, FilterCriteria};
use crate::Site;

/// Run the post filter and print the matches
pub fn run(site: &Site, term: &str, category: Option<&str>, tag: Option<&str>) -> Result<()> {
    let criteria = FilterCriteria {
        term: term.to_string(),
        category: category.map(str::to_string),
        tag: tag.map(str::to_string),
    };

    let matches = query::filter_posts(site.store().all_posts(), &criteria);

    if matches.is_empty() {
        println!("No posts matched.");
        return Ok(());
    }

    println!("Matched {} post(s):", matches.len());
    for post in matches {
        println!(
            "  {} - {}",
            helpers::display_date(&post.date),
            post.title
        );
        println!("      {}", helpers::truncate(&post.description, 48, None));
    }

    Ok(())
}

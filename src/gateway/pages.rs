//! Gemtext page templates

use crate::footer::escape_target;

use super::language::Language;
use super::search::SearchResult;

/// Reader-facing title of an article path
pub fn title_from_path(name: &str) -> String {
    name.replace('_', " ")
}

/// Landing page with one search entry per language
pub fn home_page<S: AsRef<str>>(languages: &[S]) -> String {
    let mut page = String::from("# Wikipedia\n\nRead encyclopedia articles as gemtext.\n\n");
    for lang in languages {
        let lang = lang.as_ref();
        page.push_str(&format!("=> /{lang}/ Search {lang}.wikipedia.org\n"));
    }
    page
}

/// Results of a search in `language`
pub fn search_page(language: &Language, query: &str, results: &[SearchResult]) -> String {
    let mut page = format!("# Search: {query}\n\n");
    if results.is_empty() {
        page.push_str("No articles found.\n");
    }
    for result in results {
        page.push_str(&format!(
            "=> /{language}/{} {}\n",
            escape_target(&result.path),
            result.name
        ));
    }
    page.push_str(&format!("\n=> /{language}/ New search\n"));
    page
}

/// Converted article wrapped with its title and navigation links
pub fn article_page(language: &Language, name: &str, body: &str) -> String {
    let mut page = format!("# {}\n", title_from_path(name));
    page.push_str(body);
    if !page.ends_with('\n') {
        page.push('\n');
    }
    page.push_str(&format!("\n=> /{language}/ Search\n"));
    page.push_str(&format!(
        "=> {} Read on the web\n",
        language.article_url(&escape_target(name))
    ));
    page
}

/// Crawler exclusions for every language tree
///
/// Article trees are effectively unbounded, so crawlers are kept out of all
/// of them.
pub fn robots_txt<S: AsRef<str>>(languages: &[S]) -> String {
    let mut robots = String::from("User-agent: *\nDisallow: /search");
    for lang in languages {
        robots.push_str("\nDisallow: /");
        robots.push_str(lang.as_ref());
    }
    robots
}

use scraper::{Html, Selector};
use url::Url;

const RESULT_LINK_SELECTOR: &str = "a.result__a";
const REDIRECT_TARGET_PARAM: &str = "uddg";
const SEARCH_ENGINE_HOST: &str = "duckduckgo.com";

/// Extracts up to `count` outbound result URLs from a DuckDuckGo HTML results
/// page. Redirect links are unwrapped and links back into the search engine
/// (ads, pagination) are dropped.
pub fn parse_search_results(html: &str, base_url: &str, count: usize) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let Ok(selector) = Selector::parse(RESULT_LINK_SELECTOR) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut urls = Vec::new();
    for anchor in document.select(&selector) {
        if urls.len() >= count {
            break;
        }
        let Some(target) = anchor
            .value()
            .attr("href")
            .and_then(|href| result_target(&base, href))
        else {
            continue;
        };
        if !urls.contains(&target) {
            urls.push(target);
        }
    }

    urls
}

fn result_target(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href.trim()).ok()?;
    let target = resolved
        .query_pairs()
        .find(|(key, _)| key == REDIRECT_TARGET_PARAM)
        .and_then(|(_, value)| Url::parse(&value).ok())
        .unwrap_or(resolved);

    if !matches!(target.scheme(), "http" | "https") {
        return None;
    }
    if target
        .host_str()
        .is_some_and(|host| host == SEARCH_ENGINE_HOST || host.ends_with(".duckduckgo.com"))
    {
        return None;
    }

    Some(target.to_string())
}

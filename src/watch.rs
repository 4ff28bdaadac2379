use serde::{Deserialize, Serialize};

use crate::config::{EmbedProvider, WatchConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Embed,
    Direct,
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchLink {
    pub name: String,
    pub url: String,
    pub kind: LinkKind,
}

fn provider_links(providers: &[EmbedProvider], id: &str, kind: LinkKind) -> Vec<WatchLink> {
    providers
        .iter()
        .map(|p| WatchLink {
            name: p.name.clone(),
            url: p.url.replace("{id}", id),
            kind,
        })
        .collect()
}

fn search_link(name: &str, base: &str, query: &str) -> WatchLink {
    WatchLink {
        name: name.to_string(),
        url: format!("{}{}", base, urlencoding::encode(query)),
        kind: LinkKind::External,
    }
}

/// Embeds, then direct pages, then title searches.
pub fn watch_links(external_id: i64, title: &str, config: &WatchConfig) -> Vec<WatchLink> {
    let id = external_id.to_string();
    let mut links = provider_links(&config.embeds, &id, LinkKind::Embed);
    links.extend(provider_links(&config.direct, &id, LinkKind::Direct));

    links.push(search_link(
        "Search on JustWatch",
        "https://www.justwatch.com/us/search?q=",
        title,
    ));
    links.push(search_link(
        "Google Search",
        "https://www.google.com/search?q=",
        &format!("{} watch online free", title),
    ));
    links.push(search_link(
        "YouTube Search",
        "https://www.youtube.com/results?search_query=",
        &format!("{} trailer", title),
    ));
    links
}

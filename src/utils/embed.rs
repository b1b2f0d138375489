use url::Url;

static EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// YouTube watch, short and embed links become an autoplaying embed URL.
/// Anything else is returned unchanged.
pub fn embed_url(url: &str) -> String {
    match youtube_video_id(url) {
        Some(id) => format!("{EMBED_BASE}{id}?autoplay=1"),
        None => url.to_string(),
    }
}

fn youtube_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let id = match host {
        "youtu.be" => parsed.path_segments()?.next().map(str::to_string),
        "youtube.com" if parsed.path() == "/watch" => parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned()),
        "youtube.com" => {
            let mut segments = parsed.path_segments()?;
            match segments.next() {
                Some("embed") => segments.next().map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    };

    id.filter(|id| !id.is_empty())
}

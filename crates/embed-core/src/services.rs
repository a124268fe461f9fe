//! Built-in service catalog
//!
//! Order matters: it is the order in which the pattern index is scanned when
//! the host looks for a service matching a pasted URL.

use regex::Regex;
use std::sync::OnceLock;

use crate::embed::Dimension;
use crate::extract::IdStrategy;
use crate::service::ServiceConfig;

struct Builtin {
    key: &'static str,
    regex: &'static str,
    embed_url: &'static str,
    html: &'static str,
    width: u32,
    height: u32,
    id: Option<fn() -> IdStrategy>,
}

const VIDEO_FRAME: &str =
    r#"<iframe style="width:100%;" height="320" frameborder="0" allowfullscreen></iframe>"#;
const TWITCH_FRAME: &str = r#"<iframe frameborder="0" allowfullscreen="true" scrolling="no" height="366" style="width:100%;"></iframe>"#;

const BUILTINS: &[Builtin] = &[
    Builtin {
        key: "vimeo",
        regex: r"(?:http[s]?://)?(?:www.)?vimeo\.co(?:.+/([^/]\d+)(?:#t=[\d]+)?s?$)",
        embed_url: "https://player.vimeo.com/video/<%= remote_id %>?title=0&byline=0",
        html: r#"<iframe style="width:100%;" height="320" frameborder="0"></iframe>"#,
        width: 580,
        height: 320,
        id: None,
    },
    Builtin {
        key: "youtube",
        regex: r"(?:https?://)?(?:www\.)?(?:(?:youtu\.be/)|(?:youtube\.com)/(?:v/|u/\w/|embed/|watch))(?:(?:\?v=)?([^#&?=]*))?((?:[?&]\w*=\w*)*)",
        embed_url: "https://www.youtube.com/embed/<%= remote_id %>",
        html: VIDEO_FRAME,
        width: 580,
        height: 320,
        id: Some(|| IdStrategy::YouTube),
    },
    Builtin {
        key: "coub",
        regex: r"https?://coub\.com/view/([^/?&]+)",
        embed_url: "https://coub.com/embed/<%= remote_id %>",
        html: VIDEO_FRAME,
        width: 580,
        height: 320,
        id: None,
    },
    Builtin {
        key: "vine",
        regex: r"https?://vine\.co/v/([^/?&]+)",
        embed_url: "https://vine.co/v/<%= remote_id %>/embed/simple/",
        html: VIDEO_FRAME,
        width: 580,
        height: 320,
        id: None,
    },
    Builtin {
        key: "imgur",
        regex: r"https?://(?:i\.)?imgur\.com.*/([a-zA-Z0-9]+)(?:\.gifv)?",
        embed_url: "http://imgur.com/<%= remote_id %>/embed",
        html: r#"<iframe allowfullscreen="true" scrolling="no" id="imgur-embed-iframe-pub-<%= remote_id %>" class="imgur-embed-iframe-pub" style="height: 500px; width: 100%; border: 1px solid #000"></iframe>"#,
        width: 540,
        height: 500,
        id: None,
    },
    Builtin {
        key: "gfycat",
        regex: r"https?://gfycat\.com(?:/detail)?/([a-zA-Z]+)",
        embed_url: "https://gfycat.com/ifr/<%= remote_id %>",
        html: r#"<iframe frameborder='0' scrolling='no' style="width:100%;" height='436' allowfullscreen ></iframe>"#,
        width: 580,
        height: 436,
        id: None,
    },
    Builtin {
        key: "twitch-channel",
        regex: r"https?://www\.twitch\.tv/([^/?&]*)/?$",
        embed_url: "https://player.twitch.tv/?channel=<%= remote_id %>",
        html: TWITCH_FRAME,
        width: 600,
        height: 366,
        id: None,
    },
    Builtin {
        key: "twitch-video",
        regex: r"https?://www\.twitch\.tv/(?:[^/?&]*/v|videos)/([0-9]*)",
        embed_url: "https://player.twitch.tv/?video=v<%= remote_id %>",
        html: TWITCH_FRAME,
        width: 600,
        height: 366,
        id: None,
    },
    Builtin {
        key: "yandex-music-album",
        regex: r"https?://music\.yandex\.ru/album/([0-9]*)/?$",
        embed_url: "https://music.yandex.ru/iframe/#album/<%= remote_id %>/",
        html: r#"<iframe frameborder="0" style="border:none;width:540px;height:400px;" style="width:100%;" height="400"></iframe>"#,
        width: 540,
        height: 400,
        id: None,
    },
    Builtin {
        key: "yandex-music-track",
        regex: r"https?://music\.yandex\.ru/album/([0-9]*)/track/([0-9]*)",
        embed_url: "https://music.yandex.ru/iframe/#track/<%= remote_id %>/",
        html: r#"<iframe frameborder="0" style="border:none;width:540px;height:100px;" style="width:100%;" height="100"></iframe>"#,
        width: 540,
        height: 100,
        id: Some(|| IdStrategy::join("/")),
    },
    Builtin {
        key: "yandex-music-playlist",
        regex: r"https?://music\.yandex\.ru/users/([^/?&]*)/playlists/([0-9]*)",
        embed_url: "https://music.yandex.ru/iframe/#playlist/<%= remote_id %>/show/cover/description/",
        html: r#"<iframe frameborder="0" style="border:none;width:540px;height:400px;" width="540" height="400"></iframe>"#,
        width: 540,
        height: 400,
        id: Some(|| IdStrategy::join("/")),
    },
    Builtin {
        key: "codepen",
        regex: r"https?://codepen\.io/([^/?&]*)/pen/([^/?&]*)",
        embed_url: "https://codepen.io/<%= remote_id %>?height=300&theme-id=0&default-tab=css,result&embed-version=2",
        html: r#"<iframe height='300' scrolling='no' frameborder='no' allowtransparency='true' allowfullscreen='true' style='width: 100%;'></iframe>"#,
        width: 600,
        height: 300,
        id: Some(|| IdStrategy::join("/embed/")),
    },
    Builtin {
        key: "instagram",
        regex: r"https?://www\.instagram\.com/p/([^/?&]+)/?",
        embed_url: "https://www.instagram.com/p/<%= remote_id %>/embed",
        html: r#"<iframe width="400" height="505" style="margin: 0 auto;" frameborder="0" scrolling="no" allowtransparency="true"></iframe>"#,
        width: 400,
        height: 505,
        id: None,
    },
    Builtin {
        key: "twitter",
        regex: r"^https?://twitter\.com/(?:#!/)?(\w+)/status(?:es)?/(\d+)(?:/.*)?$",
        embed_url: "https://twitframe.com/show?url=https://twitter.com/<%= remote_id %>",
        html: r#"<iframe width="600" height="600" style="margin: 0 auto;" frameborder="0" scrolling="no" allowtransparency="true"></iframe>"#,
        width: 600,
        height: 300,
        id: Some(|| IdStrategy::join("/status/")),
    },
];

/// Built-in services, in catalog order
pub fn builtin_services() -> &'static [(&'static str, ServiceConfig)] {
    static SERVICES: OnceLock<Vec<(&'static str, ServiceConfig)>> = OnceLock::new();
    SERVICES.get_or_init(|| {
        BUILTINS
            .iter()
            .map(|builtin| {
                let service = ServiceConfig {
                    regex: Regex::new(builtin.regex).expect("built-in service pattern is valid"),
                    embed_url: builtin.embed_url.to_string(),
                    html: builtin.html.to_string(),
                    width: Dimension::try_from(builtin.width).ok(),
                    height: Dimension::try_from(builtin.height).ok(),
                    id: builtin.id.map(|strategy| strategy()),
                };
                (builtin.key, service)
            })
            .collect()
    })
}

/// Keys of the built-in services, in catalog order
pub fn builtin_keys() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|builtin| builtin.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::REMOTE_ID_PLACEHOLDER;

    fn service(key: &str) -> &'static ServiceConfig {
        builtin_services()
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, service)| service)
            .unwrap()
    }

    #[test]
    fn test_catalog_is_complete() {
        let keys: Vec<_> = builtin_keys().collect();
        assert_eq!(keys.len(), 14);
        assert_eq!(keys[0], "vimeo");
        assert_eq!(keys[13], "twitter");
        assert_eq!(builtin_services().len(), keys.len());
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = builtin_keys().collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), BUILTINS.len());
    }

    #[test]
    fn test_templates_carry_placeholder() {
        for (key, service) in builtin_services() {
            assert!(service.embed_url.contains(REMOTE_ID_PLACEHOLDER), "{key}");
            assert!(!service.html.is_empty(), "{key}");
        }
    }

    #[test]
    fn test_vimeo_variants() {
        let vimeo = service("vimeo");
        assert_eq!(vimeo.extract_id("https://vimeo.com/289836809").as_deref(), Some("289836809"));
        assert_eq!(vimeo.extract_id("vimeo.com/289836809").as_deref(), Some("289836809"));
        assert_eq!(
            vimeo.extract_id("https://www.vimeo.com/channels/staffpicks/280712228").as_deref(),
            Some("280712228")
        );
        assert!(!vimeo.is_match("https://vimeo.com/"));
    }

    #[test]
    fn test_youtube_variants() {
        let youtube = service("youtube");
        assert_eq!(youtube.extract_id("https://youtu.be/wZZ7oFKsKzY").as_deref(), Some("wZZ7oFKsKzY"));
        assert_eq!(
            youtube.extract_id("https://www.youtube.com/embed/wZZ7oFKsKzY").as_deref(),
            Some("wZZ7oFKsKzY")
        );
        assert_eq!(
            youtube.extract_id("youtube.com/watch?v=wZZ7oFKsKzY&list=PL9&index=2").as_deref(),
            Some("wZZ7oFKsKzY?list=PL9")
        );
        assert_eq!(
            youtube.extract_id("https://www.youtube.com/watch?feature=share&v=wZZ7oFKsKzY").as_deref(),
            Some("wZZ7oFKsKzY?")
        );
    }

    #[test]
    fn test_twitch_channel_does_not_take_videos() {
        assert!(service("twitch-channel").is_match("https://www.twitch.tv/ninja/"));
        assert!(!service("twitch-channel").is_match("https://www.twitch.tv/videos/315468440"));
        assert_eq!(
            service("twitch-video")
                .extract_id("https://www.twitch.tv/ninja/v/315468440")
                .as_deref(),
            Some("315468440")
        );
    }

    #[test]
    fn test_twitter_joins_user_and_status() {
        assert_eq!(
            service("twitter")
                .embed_url_for("https://twitter.com/codex_team/status/1202295536826630145")
                .as_deref(),
            Some("https://twitframe.com/show?url=https://twitter.com/codex_team/status/1202295536826630145")
        );
        assert!(!service("twitter").is_match("https://twitter.com/codex_team"));
    }

    #[test]
    fn test_instagram_and_vine() {
        assert_eq!(
            service("instagram")
                .embed_url_for("https://www.instagram.com/p/B7KmVbvqKzF/")
                .as_deref(),
            Some("https://www.instagram.com/p/B7KmVbvqKzF/embed")
        );
        assert_eq!(
            service("vine").embed_url_for("https://vine.co/v/iV2Wx1nJmdm").as_deref(),
            Some("https://vine.co/v/iV2Wx1nJmdm/embed/simple/")
        );
    }
}

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use super::links::is_absolute_url;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*['"]?([^'")]*?)['"]?\s*\)"#).unwrap());

/// Stylesheet representation for rewriting the resources it references
#[derive(Debug, Clone)]
pub struct Stylesheet {
    content: String,
    /// map from raw matching string to the referenced path
    resources: HashMap<String, String>,
}

fn resources(content: &str) -> HashMap<String, String> {
    let mut resources = HashMap::new();
    for r in URL.captures_iter(content) {
        let path = r[1].trim();
        // skip inlined data and external links
        if path.is_empty() || path.starts_with("data:") || is_absolute_url(path) {
            continue;
        }
        resources.insert(r[0].to_owned(), path.to_owned());
    }
    resources
}

impl Stylesheet {
    pub fn new(content: impl Into<String>) -> Stylesheet {
        let content = content.into();
        let resources = resources(&content);
        Stylesheet { content, resources }
    }

    /// Raw `url(...)` occurrence and the path it references, sorted by raw string
    pub fn resources(&self) -> Vec<(&str, &str)> {
        let mut resources: Vec<(&str, &str)> = self
            .resources
            .iter()
            .map(|(raw, path)| (raw.as_str(), path.as_str()))
            .collect();
        resources.sort();
        resources
    }

    /// Point every occurrence of `raw` to `updated_path`
    pub fn update_resource(&mut self, raw: &str, updated_path: &str) {
        if self.resources.remove(raw).is_some() {
            let updated = format!("url({updated_path})");
            self.content = self.content.replace(raw, &updated);
            self.resources.insert(updated, updated_path.to_owned());
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stylesheet_resources() {
        let stylesheet = Stylesheet::new(
            r#"@font-face {
  font-family: "Roboto";
  src: url("../font/roboto.woff2") format("woff2");
}
.nav-toggle { background: url(../images/menu.svg) no-repeat; }
.home-link { background-image: url('../images/home.svg') }
.remote { background: url(https://example.com/x.png) }
.inline { background: url(data:image/png;base64,AAAA) }"#,
        );

        assert_eq!(
            stylesheet.resources(),
            vec![
                (r#"url("../font/roboto.woff2")"#, "../font/roboto.woff2"),
                ("url('../images/home.svg')", "../images/home.svg"),
                ("url(../images/menu.svg)", "../images/menu.svg"),
            ]
        );
    }

    #[test]
    fn test_update_resource() {
        let mut stylesheet = Stylesheet::new(
            ".a { background: url(../images/menu.svg) } .b { background: url(../images/menu.svg) }",
        );
        stylesheet.update_resource("url(../images/menu.svg)", "../img/menu_1a2b3c4.svg");
        assert_eq!(
            stylesheet.content(),
            ".a { background: url(../img/menu_1a2b3c4.svg) } .b { background: url(../img/menu_1a2b3c4.svg) }"
        );
        assert_eq!(
            stylesheet.resources(),
            vec![("url(../img/menu_1a2b3c4.svg)", "../img/menu_1a2b3c4.svg")]
        );
    }
}

//! CSS custom properties read from a stylesheet.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::heat::PaletteProvider;

/// Every `--name: value;` declaration of a stylesheet.  Selectors are not
/// tracked; a later declaration of the same property wins.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    properties: HashMap<String, String>,
}

impl Stylesheet {
    pub fn parse(css: &str) -> Self {
        let css = strip_comments(css);
        let mut properties = HashMap::new();
        for decl in css.split(|c| matches!(c, ';' | '{' | '}')) {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if name.starts_with("--") && name.len() > 2 {
                properties.insert(name.to_string(), value.trim().to_string());
            }
        }
        Self { properties }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let css = std::fs::read_to_string(path)?;
        let sheet = Self::parse(&css);
        if sheet.is_empty() {
            tracing::warn!("No custom properties found in {}", path.display());
        }
        tracing::info!(
            "Loaded {} custom properties from {}",
            sheet.len(),
            path.display()
        );
        Ok(sheet)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PaletteProvider for Stylesheet {
    fn custom_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

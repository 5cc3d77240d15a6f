use anyhow::{anyhow, Result};
use semver::VersionReq;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A visual theme selector.
///
/// One descriptor field, two meanings: either a stylesheet path relative to the
/// descriptor's location, or a reference to an external theme package in
/// `name@versionRange` form. Serialized as the single string the renderer
/// expects, e.g. `theme/theme_print.css` or `@vivliostyle/theme-techbook@^1.0.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Theme {
    /// Relative path to a local stylesheet resource.
    Stylesheet(PathBuf),
    /// External theme package reference.
    Package(ThemePackage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemePackage {
    pub name: String,
    pub version: VersionReq,
}

impl Theme {
    pub fn package<S: ToString>(name: S, version: VersionReq) -> Theme {
        Theme::Package(ThemePackage {
            name: name.to_string(),
            version,
        })
    }

    /// The local stylesheet path, if this theme is one.
    pub fn stylesheet(&self) -> Option<&PathBuf> {
        match self {
            Theme::Stylesheet(path) => Some(path),
            Theme::Package(_) => None,
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Theme> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("Theme reference is empty"));
        }

        // an '@' past the first byte separates a package name from its version
        // range; a leading '@' is an npm scope, not a separator
        if let Some(at) = s.rfind('@').filter(|&at| at > 0) {
            let (name, range) = (&s[..at], &s[at + 1..]);
            let version = VersionReq::parse(range)
                .map_err(|e| anyhow!("Invalid theme version range '{range}': {e}"))?;
            return Ok(Theme::package(name, version));
        }

        // a bare scoped package name without a version range
        if s.starts_with('@') && s.contains('/') {
            return Ok(Theme::package(s, VersionReq::STAR));
        }

        Ok(Theme::Stylesheet(PathBuf::from(s)))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Stylesheet(path) => write!(f, "{}", path.display()),
            Theme::Package(pkg) => write!(f, "{}@{}", pkg.name, pkg.version),
        }
    }
}

impl Serialize for Theme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Theme, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_local_stylesheet_path() {
        let theme: Theme = "theme/theme_print.css".parse().expect("can parse");
        assert_eq!(
            theme,
            Theme::Stylesheet(PathBuf::from("theme/theme_print.css"))
        );
    }

    #[test]
    fn parses_scoped_package_with_version_range() {
        let theme: Theme = "@vivliostyle/theme-techbook@^1.0.0"
            .parse()
            .expect("can parse");
        match theme {
            Theme::Package(pkg) => {
                assert_eq!(pkg.name, "@vivliostyle/theme-techbook");
                assert_eq!(pkg.version, VersionReq::parse("^1.0.0").unwrap());
            }
            other => panic!("expected package theme, got {other:?}"),
        }
    }

    #[test]
    fn parses_unscoped_package_with_version_range() {
        let theme: Theme = "theme-classic@>=2.1".parse().expect("can parse");
        match theme {
            Theme::Package(pkg) => {
                assert_eq!(pkg.name, "theme-classic");
                assert_eq!(pkg.version, VersionReq::parse(">=2.1").unwrap());
            }
            other => panic!("expected package theme, got {other:?}"),
        }
    }

    #[test]
    fn bare_scoped_name_defaults_to_any_version() {
        let theme: Theme = "@vivliostyle/theme-techbook".parse().expect("can parse");
        match theme {
            Theme::Package(pkg) => {
                assert_eq!(pkg.name, "@vivliostyle/theme-techbook");
                assert_eq!(pkg.version, VersionReq::STAR);
            }
            other => panic!("expected package theme, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_version_range() {
        assert!("theme-classic@not-a-version".parse::<Theme>().is_err());
        assert!("".parse::<Theme>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for s in [
            "theme/theme_ebook.css",
            "@vivliostyle/theme-techbook@^1.0.0",
            "theme-classic@>=2.1",
        ] {
            let theme: Theme = s.parse().expect("can parse");
            assert_eq!(theme.to_string(), s);
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        #[derive(Serialize)]
        struct Wrapper {
            theme: Theme,
        }

        let toml = toml::to_string(&Wrapper {
            theme: Theme::Stylesheet(PathBuf::from("theme/theme_print.css")),
        })
        .expect("can serialize");
        assert_eq!(toml.trim(), r#"theme = "theme/theme_print.css""#);
    }
}

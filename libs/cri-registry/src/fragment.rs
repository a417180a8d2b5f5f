//! Runtime configuration fragment assembly.
//!
//! # Format
//!
//! ```text
//! [plugins]
//!   [plugins.cri]
//!     [plugins.cri.registry]
//!       [plugins.cri.registry.mirrors]
//!         [plugins.cri.registry.mirrors."docker.io"]
//!           endpoint = ["https://registry-1.docker.io"]
//!       [plugins.cri.registry.configs]
//!         [plugins.cri.registry.configs."some.host:123"]
//!           [plugins.cri.registry.configs."some.host:123".auth]
//!             username = "root"
//!           [plugins.cri.registry.configs."some.host:123".tls]
//!             insecure_skip_verify = false
//!             ca_file = "/etc/cri/ca/some.host:123.crt"
//! ```
//!
//! Indentation and quoting are byte-exact; the runtime's config loader and
//! anything diffing the shared file depend on it.

use std::fmt::{self, Write as _};

use crate::artifact::FileArtifact;
use crate::credentials::HostBlock;
use crate::mirrors::MirrorBlock;

const MIRRORS_SECTION: &str = "plugins.cri.registry.mirrors";
const CONFIGS_SECTION: &str = "plugins.cri.registry.configs";

/// The nested fragment: all mirror blocks, then all host blocks.
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
    pub mirrors: &'a [MirrorBlock<'a>],
    pub hosts: &'a [HostBlock<'a>],
}

impl fmt::Display for Fragment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[plugins]")?;
        writeln!(f, "  [plugins.cri]")?;
        writeln!(f, "    [plugins.cri.registry]")?;

        writeln!(f, "      [{}]", MIRRORS_SECTION)?;
        for mirror in self.mirrors {
            writeln!(f, "        [{}.{}]", MIRRORS_SECTION, Quoted(mirror.host))?;
            f.write_str("          endpoint = [")?;
            for (i, endpoint) in mirror.endpoints.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", Quoted(endpoint))?;
            }
            writeln!(f, "]")?;
        }

        writeln!(f, "      [{}]", CONFIGS_SECTION)?;
        for host in self.hosts {
            let section = format!("{}.{}", CONFIGS_SECTION, Quoted(host.host));
            writeln!(f, "        [{}]", section)?;

            if let Some(auth) = &host.auth {
                writeln!(f, "          [{}.auth]", section)?;
                for &(key, value) in auth {
                    writeln!(f, "            {} = {}", key, Quoted(value))?;
                }
            }

            writeln!(f, "          [{}.tls]", section)?;
            writeln!(
                f,
                "            insecure_skip_verify = {}",
                host.insecure_skip_verify
            )?;
            for (key, path) in host.tls_files() {
                writeln!(f, "            {} = {}", key, Quoted(path))?;
            }
        }

        Ok(())
    }
}

/// Render the fragment and wrap it as the final `append` artifact.
pub fn assemble(
    mirrors: &[MirrorBlock<'_>],
    hosts: &[HostBlock<'_>],
    runtime_config: &str,
) -> FileArtifact {
    let text = Fragment { mirrors, hosts }.to_string();
    FileArtifact::fragment(runtime_config, text)
}

/// A value rendered as a TOML basic string.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                '\u{8}' => f.write_str("\\b")?,
                '\u{c}' => f.write_str("\\f")?,
                c if c.is_control() && (c as u32) < 0x80 => write!(f, "\\u{:04X}", c as u32)?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scaffold() {
        let text = Fragment {
            mirrors: &[],
            hosts: &[],
        }
        .to_string();

        assert_eq!(
            text,
            "[plugins]\n  [plugins.cri]\n    [plugins.cri.registry]\n      [plugins.cri.registry.mirrors]\n      [plugins.cri.registry.configs]\n"
        );
    }

    #[test]
    fn test_mirror_block() {
        let endpoints = vec!["https://a.example".to_string(), "https://b.example".to_string()];
        let mirrors = [MirrorBlock {
            host: "docker.io",
            endpoints: &endpoints,
        }];

        let text = Fragment {
            mirrors: &mirrors,
            hosts: &[],
        }
        .to_string();

        assert!(text.contains(
            "        [plugins.cri.registry.mirrors.\"docker.io\"]\n          endpoint = [\"https://a.example\", \"https://b.example\"]\n"
        ));
    }

    #[test]
    fn test_mirror_without_endpoints() {
        let mirrors = [MirrorBlock {
            host: "r.io",
            endpoints: &[],
        }];
        let text = Fragment {
            mirrors: &mirrors,
            hosts: &[],
        }
        .to_string();
        assert!(text.contains("          endpoint = []\n"));
    }

    #[test]
    fn test_host_block_without_auth_or_files() {
        let hosts = [HostBlock {
            host: "r.io",
            auth: None,
            insecure_skip_verify: false,
            ca_file: None,
            cert_file: None,
            key_file: None,
        }];

        let text = Fragment {
            mirrors: &[],
            hosts: &hosts,
        }
        .to_string();

        assert!(text.ends_with(
            "      [plugins.cri.registry.configs]\n        [plugins.cri.registry.configs.\"r.io\"]\n          [plugins.cri.registry.configs.\"r.io\".tls]\n            insecure_skip_verify = false\n"
        ));
        assert!(!text.contains(".auth]"));
    }

    #[test]
    fn test_auth_section_with_no_fields() {
        let hosts = [HostBlock {
            host: "r.io",
            auth: Some(Vec::new()),
            insecure_skip_verify: true,
            ca_file: None,
            cert_file: None,
            key_file: None,
        }];

        let text = Fragment {
            mirrors: &[],
            hosts: &hosts,
        }
        .to_string();

        assert!(text.contains(
            "          [plugins.cri.registry.configs.\"r.io\".auth]\n          [plugins.cri.registry.configs.\"r.io\".tls]\n"
        ));
        assert!(!text.contains("username"));
    }

    #[test]
    fn test_quoting() {
        assert_eq!(Quoted("plain").to_string(), "\"plain\"");
        assert_eq!(Quoted("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Quoted("c:\\dir").to_string(), "\"c:\\\\dir\"");
        assert_eq!(Quoted("l1\nl2").to_string(), "\"l1\\nl2\"");
        assert_eq!(Quoted("\u{1}").to_string(), "\"\\u0001\"");
        assert_eq!(Quoted("héllo").to_string(), "\"héllo\"");
    }

    #[test]
    fn test_assemble_wraps_as_append() {
        let artifact = assemble(&[], &[], "/var/cri/conf.d/cri.toml");
        assert_eq!(artifact.path, "/var/cri/conf.d/cri.toml");
        assert_eq!(artifact.permissions, 0o644);
        assert!(artifact.content_str().unwrap().starts_with("[plugins]\n"));
    }
}

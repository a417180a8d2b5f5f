//! End-to-end generation scenarios.

use std::collections::HashMap;

use hostcfg_cri_registry::{
    generate_registries_config, AuthSpec, ClientIdentity, FileArtifact, FileOp, HostConfig,
    MirrorSpec, Registries, RegistryConfigError, TlsSpec, DEFAULT_RUNTIME_CONFIG,
};

/// Registries backed by plain maps, independent of any config loading.
#[derive(Default)]
struct StaticRegistries {
    mirrors: HashMap<String, MirrorSpec>,
    config: HashMap<String, HostConfig>,
}

impl Registries for StaticRegistries {
    fn mirrors(&self) -> &HashMap<String, MirrorSpec> {
        &self.mirrors
    }

    fn config(&self) -> &HashMap<String, HostConfig> {
        &self.config
    }
}

fn full_host() -> HostConfig {
    HostConfig::default()
        .with_auth(AuthSpec {
            username: Some("root".to_string()),
            password: Some("secret".to_string()),
            auth: Some("auth".to_string()),
            identity_token: Some("token".to_string()),
        })
        .with_tls(TlsSpec {
            insecure_skip_verify: true,
            ca: Some(b"cacert".to_vec()),
            client_identity: Some(ClientIdentity::new("clientcert", "clientkey")),
        })
}

fn fragment_text(files: &[FileArtifact]) -> &str {
    let last = files.last().expect("fragment is always emitted");
    assert_eq!(last.op, FileOp::Append);
    last.content_str().expect("fragment is utf-8")
}

#[test]
fn generates_mirrors_and_host_material() {
    let mut registries = StaticRegistries::default();
    registries.mirrors.insert(
        "docker.io".to_string(),
        MirrorSpec::new([
            "https://registry-1.docker.io",
            "https://registry-2.docker.io",
        ]),
    );
    registries
        .config
        .insert("some.host:123".to_string(), full_host());

    let files = generate_registries_config(&registries).unwrap();

    assert_eq!(
        files,
        vec![
            FileArtifact {
                path: "/etc/cri/ca/some.host:123.crt".to_string(),
                content: b"cacert".to_vec(),
                permissions: 0o600,
                op: FileOp::Create,
            },
            FileArtifact {
                path: "/etc/cri/client/some.host:123.crt".to_string(),
                content: b"clientcert".to_vec(),
                permissions: 0o600,
                op: FileOp::Create,
            },
            FileArtifact {
                path: "/etc/cri/client/some.host:123.key".to_string(),
                content: b"clientkey".to_vec(),
                permissions: 0o600,
                op: FileOp::Create,
            },
            FileArtifact {
                path: DEFAULT_RUNTIME_CONFIG.to_string(),
                content: r#"[plugins]
  [plugins.cri]
    [plugins.cri.registry]
      [plugins.cri.registry.mirrors]
        [plugins.cri.registry.mirrors."docker.io"]
          endpoint = ["https://registry-1.docker.io", "https://registry-2.docker.io"]
      [plugins.cri.registry.configs]
        [plugins.cri.registry.configs."some.host:123"]
          [plugins.cri.registry.configs."some.host:123".auth]
            username = "root"
            password = "secret"
            auth = "auth"
            identitytoken = "token"
          [plugins.cri.registry.configs."some.host:123".tls]
            insecure_skip_verify = true
            ca_file = "/etc/cri/ca/some.host:123.crt"
            cert_file = "/etc/cri/client/some.host:123.crt"
            key_file = "/etc/cri/client/some.host:123.key"
"#
                .as_bytes()
                .to_vec(),
                permissions: 0o644,
                op: FileOp::Append,
            },
        ]
    );
}

#[test]
fn empty_input_yields_only_scaffold() {
    let files = generate_registries_config(&StaticRegistries::default()).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, DEFAULT_RUNTIME_CONFIG);
    assert_eq!(files[0].permissions, 0o644);
    assert_eq!(
        fragment_text(&files),
        r#"[plugins]
  [plugins.cri]
    [plugins.cri.registry]
      [plugins.cri.registry.mirrors]
      [plugins.cri.registry.configs]
"#
    );
}

#[test]
fn tls_without_material_keeps_insecure_flag_only() {
    let mut registries = StaticRegistries::default();
    registries.config.insert(
        "registry.local:5000".to_string(),
        HostConfig::default().with_tls(TlsSpec {
            insecure_skip_verify: true,
            ..TlsSpec::default()
        }),
    );

    let files = generate_registries_config(&registries).unwrap();

    assert_eq!(files.len(), 1);
    let text = fragment_text(&files);
    assert!(text.ends_with(
        r#"        [plugins.cri.registry.configs."registry.local:5000"]
          [plugins.cri.registry.configs."registry.local:5000".tls]
            insecure_skip_verify = true
"#
    ));
    assert!(!text.contains("ca_file"));
    assert!(!text.contains("cert_file"));
    assert!(!text.contains("key_file"));
}

#[test]
fn unset_auth_fields_are_omitted() {
    let mut registries = StaticRegistries::default();
    registries.config.insert(
        "r.io".to_string(),
        HostConfig::default().with_auth(AuthSpec {
            username: Some("bot".to_string()),
            password: Some(String::new()),
            auth: None,
            identity_token: None,
        }),
    );

    let files = generate_registries_config(&registries).unwrap();
    let text = fragment_text(&files);

    assert!(text.contains(
        "          [plugins.cri.registry.configs.\"r.io\".auth]\n            username = \"bot\"\n          [plugins.cri.registry.configs.\"r.io\".tls]\n            insecure_skip_verify = false\n"
    ));
    assert!(!text.contains("password"));
    assert!(!text.contains("identitytoken"));
    assert!(!text.contains("auth = "));
}

#[test]
fn password_and_identity_token_are_both_kept() {
    let mut registries = StaticRegistries::default();
    registries.config.insert(
        "r.io".to_string(),
        HostConfig::default().with_auth(AuthSpec {
            password: Some("pw".to_string()),
            identity_token: Some("tok".to_string()),
            ..AuthSpec::default()
        }),
    );

    let files = generate_registries_config(&registries).unwrap();
    let text = fragment_text(&files);
    assert!(text.contains("            password = \"pw\"\n            identitytoken = \"tok\"\n"));
}

#[test]
fn mirrors_precede_configs_in_host_order() {
    let mut registries = StaticRegistries::default();
    for host in ["quay.io", "docker.io"] {
        registries
            .mirrors
            .insert(host.to_string(), MirrorSpec::new([format!("https://mirror.{host}")]));
    }
    for host in ["z.io", "a.io"] {
        registries
            .config
            .insert(host.to_string(), HostConfig::default());
    }

    let files = generate_registries_config(&registries).unwrap();
    let text = fragment_text(&files);

    let positions: Vec<usize> = [
        "mirrors.\"docker.io\"",
        "mirrors.\"quay.io\"",
        "[plugins.cri.registry.configs]",
        "configs.\"a.io\"]",
        "configs.\"z.io\"]",
    ]
    .iter()
    .map(|needle| text.find(needle).unwrap())
    .collect();

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn empty_host_identifier_fails_whole_call() {
    let mut registries = StaticRegistries::default();
    registries
        .config
        .insert("ok.io".to_string(), full_host());
    registries.config.insert(String::new(), full_host());

    let err = generate_registries_config(&registries).unwrap_err();
    assert!(matches!(err, RegistryConfigError::InvalidHost { .. }));
}

#[test]
fn host_with_quotes_is_escaped_in_sections() {
    let mut registries = StaticRegistries::default();
    registries
        .mirrors
        .insert("odd\"host".to_string(), MirrorSpec::new(["https://x"]));

    let files = generate_registries_config(&registries).unwrap();
    assert!(fragment_text(&files).contains("[plugins.cri.registry.mirrors.\"odd\\\"host\"]"));
}

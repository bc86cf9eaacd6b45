//! End-to-end tests for container-fleet user-data rendering

use userdata_rs::{
    ContainerFleet, CredentialContext, ImageRef, OsFamily, Session, UserData, UserDataError,
};

fn full_credentials() -> CredentialContext {
    let session = Session::new()
        .region("us-east-1")
        .access_key("AKIA123")
        .secret_key("sekret");
    CredentialContext::resolve(Some(&session))
}

// ==================== Determinism ====================

/// Identical inputs must render byte-identical output
#[test]
fn test_render_is_deterministic() {
    let fleet = ContainerFleet::new(ImageRef::new("host/app"))
        .os(OsFamily::Ubuntu)
        .env("DEBUG", "true")
        .cmd("python main.py");
    let credentials = full_credentials();

    let first = fleet.render(&credentials).unwrap();
    let second = fleet.render(&credentials).unwrap();
    assert_eq!(first, second);
}

/// Every rendered script ends with exactly one newline and no other
/// trailing whitespace
#[test]
fn test_render_ends_with_exactly_one_newline() {
    let fleets = [
        ContainerFleet::new(ImageRef::new("host/app")),
        ContainerFleet::new(ImageRef::new("host/app"))
            .os(OsFamily::Debian)
            .env("A", "1")
            .cmd("run --flag"),
        ContainerFleet::new(ImageRef::new("")).include_aws_env(false),
    ];

    for fleet in fleets {
        let script = fleet.render(&CredentialContext::default()).unwrap();
        assert!(script.ends_with('\n'), "missing trailing newline");
        assert!(!script.ends_with("\n\n"), "more than one trailing newline");
        let before_newline = &script[..script.len() - 1];
        assert!(
            !before_newline.ends_with(char::is_whitespace),
            "trailing whitespace before final newline"
        );
    }
}

// ==================== Image resolution ====================

/// A tag embedded in the image path wins over the fallback tag
#[test]
fn test_embedded_tag_wins_in_rendered_script() {
    let fleet = ContainerFleet::new(ImageRef::new("host/repo:v2").with_tag("latest"));
    let script = fleet.render(&CredentialContext::default()).unwrap();

    assert!(script.contains("docker pull host/repo:v2"));
    assert!(!script.contains("host/repo:v2:latest"));
}

/// Without an embedded tag the fallback tag is appended
#[test]
fn test_fallback_tag_in_rendered_script() {
    let fleet = ContainerFleet::new(ImageRef::new("host/repo"));
    let script = fleet.render(&CredentialContext::default()).unwrap();

    assert!(script.contains("docker pull host/repo:latest"));
}

// ==================== Environment precedence ====================

/// Caller-supplied entries beat injected credentials
#[test]
fn test_explicit_env_beats_injected_credentials() {
    let fleet = ContainerFleet::new(ImageRef::new("host/app")).env("AWS_REGION", "custom");
    let script = fleet.render(&full_credentials()).unwrap();

    assert_eq!(script.matches("-e AWS_REGION=").count(), 1);
    assert!(script.contains("-e AWS_REGION=custom"));
    assert!(!script.contains("-e AWS_REGION=us-east-1"));
}

/// Injected credentials follow caller entries in region/access/secret order
#[test]
fn test_injected_credentials_render_in_fixed_order() {
    let fleet = ContainerFleet::new(ImageRef::new("host/app")).env("DEBUG", "true");
    let script = fleet.render(&full_credentials()).unwrap();

    assert!(script.contains(
        "-e DEBUG=true -e AWS_REGION=us-east-1 -e AWS_ACCESS_KEY_ID=AKIA123 \
         -e AWS_SECRET_ACCESS_KEY=sekret"
    ));
}

/// Disabling credential injection leaves only caller entries
#[test]
fn test_no_aws_env_renders_only_caller_entries() {
    let fleet = ContainerFleet::new(ImageRef::new("host/app"))
        .env("DEBUG", "true")
        .include_aws_env(false);
    let script = fleet.render(&full_credentials()).unwrap();

    assert!(script.contains("-e DEBUG=true"));
    assert!(!script.contains("-e AWS_REGION="));
    assert!(!script.contains("-e AWS_ACCESS_KEY_ID="));
    assert!(!script.contains("-e AWS_SECRET_ACCESS_KEY="));
}

// ==================== OS selection ====================

/// Families without a bootstrap mapping fail with the family named
#[test]
fn test_unsupported_os_fails_render() {
    for os in [OsFamily::Windows, OsFamily::Macos, OsFamily::SuseLinux] {
        let fleet = ContainerFleet::new(ImageRef::new("host/app")).os(os);
        let err = fleet.render(&CredentialContext::default()).unwrap_err();

        match err {
            UserDataError::UnsupportedOs { os: reported } => assert_eq!(reported, os),
            other => panic!("expected UnsupportedOs, got {other:?}"),
        }
    }
}

/// The yum and apt families emit their own installer blocks
#[test]
fn test_installer_block_matches_os_family() {
    let yum = ContainerFleet::new(ImageRef::new("host/app"))
        .os(OsFamily::RedHat)
        .render(&CredentialContext::default())
        .unwrap();
    assert!(yum.contains("yum install -y docker aws-cli"));
    assert!(!yum.contains("apt-get"));

    let apt = ContainerFleet::new(ImageRef::new("host/app"))
        .os(OsFamily::Debian)
        .render(&CredentialContext::default())
        .unwrap();
    assert!(apt.contains("apt-get install -y docker.io awscli"));
    assert!(!apt.contains("yum"));
}

// ==================== Command override ====================

/// A command override clears the entrypoint and trails the image unquoted
#[test]
fn test_command_override() {
    let fleet = ContainerFleet::new(ImageRef::new("host/app")).cmd("python main.py --x 1");
    let script = fleet.render(&CredentialContext::default()).unwrap();

    let run_line = script
        .lines()
        .find(|line| line.contains("docker run"))
        .unwrap();
    assert!(run_line.contains("--entrypoint ''"));
    assert!(run_line.ends_with("python main.py --x 1\""));
}

/// Without an override the image's own entrypoint and command are kept
#[test]
fn test_empty_command_keeps_image_entrypoint() {
    let fleet = ContainerFleet::new(ImageRef::new("host/app")).include_aws_env(false);
    let script = fleet.render(&CredentialContext::default()).unwrap();

    let run_line = script
        .lines()
        .find(|line| line.contains("docker run"))
        .unwrap();
    assert!(!run_line.contains("--entrypoint"));
    assert!(run_line.ends_with("docker run -d --restart=always host/app:latest\""));
}

// ==================== Quoting ====================

/// Strip one level of POSIX quoting from a shell word
fn shell_unquote(word: &str) -> String {
    let mut out = String::new();
    let mut chars = word.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                for inner in chars.by_ref() {
                    if inner == '\'' {
                        break;
                    }
                    out.push(inner);
                }
            }
            '"' => {
                for inner in chars.by_ref() {
                    if inner == '"' {
                        break;
                    }
                    out.push(inner);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// A value with a quote and a space survives shell tokenization intact
#[test]
fn test_env_value_with_quote_and_space_round_trips() {
    let fleet = ContainerFleet::new(ImageRef::new("host/app"))
        .env("GREETING", "it's ok")
        .include_aws_env(false);
    let script = fleet.render(&CredentialContext::default()).unwrap();

    let flag = "-e GREETING='it'\"'\"'s ok'";
    assert!(script.contains(flag), "flag not found in:\n{script}");

    let word = flag.strip_prefix("-e ").unwrap();
    assert_eq!(shell_unquote(word), "GREETING=it's ok");
}

/// Credential exports in the login command are quoted
#[test]
fn test_login_command_quotes_credentials() {
    let session = Session::new()
        .region("us east 1")
        .access_key("AKIA123")
        .secret_key("pa$s word");
    let fleet = ContainerFleet::new(ImageRef::new("host/app"));
    let script = fleet
        .render(&CredentialContext::resolve(Some(&session)))
        .unwrap();

    assert!(script.contains("AWS_REGION='us east 1'"));
    assert!(script.contains("AWS_SECRET_ACCESS_KEY='pa$s word'"));
}

// ==================== Full scenario ====================

/// Ubuntu render with no credentials and no extras: apt installer block,
/// empty-string credential exports, tagged pull and run, bare run command
#[test]
fn test_ubuntu_render_without_credentials() {
    let fleet = ContainerFleet::new(ImageRef::new("123.dkr.ecr.us-east-1.amazonaws.com/app"))
        .os(OsFamily::Ubuntu)
        .include_aws_env(false);
    let script = fleet.render(&CredentialContext::resolve(None)).unwrap();

    let expected = "\
#!/bin/bash
set -euo pipefail

apt-get update -y
apt-get install -y docker.io awscli
systemctl enable docker
systemctl start docker
usermod -a -G docker ubuntu || true

# Authenticate to ECR and pull the image
su - ec2-user -c \"AWS_REGION='' AWS_ACCESS_KEY_ID='' AWS_SECRET_ACCESS_KEY='' \
aws ecr get-login-password --region '' \
| docker login --username AWS --password-stdin 123.dkr.ecr.us-east-1.amazonaws.com\"
su - ec2-user -c \"docker pull 123.dkr.ecr.us-east-1.amazonaws.com/app:latest\"

# Run the container in detached mode
su - ec2-user -c \"docker run -d --restart=always 123.dkr.ecr.us-east-1.amazonaws.com/app:latest\"
";

    assert_eq!(script, expected);
}

/// Full render with credentials on the default OS family
#[test]
fn test_amazon_linux_render_with_credentials() {
    let fleet = ContainerFleet::new(ImageRef::new("host/app")).env("DEBUG", "true");
    let script = fleet.render(&full_credentials()).unwrap();

    assert!(script.starts_with("#!/bin/bash\nset -euo pipefail\n\n"));
    assert!(script.contains("yum update -y"));
    assert!(script.contains("usermod -a -G docker ec2-user"));
    assert!(script.contains(
        "su - ec2-user -c \"AWS_REGION=us-east-1 AWS_ACCESS_KEY_ID=AKIA123 \
         AWS_SECRET_ACCESS_KEY=sekret aws ecr get-login-password --region us-east-1 \
         | docker login --username AWS --password-stdin host\""
    ));
    assert!(script.contains("su - ec2-user -c \"docker pull host/app:latest\""));
    assert!(script.contains(
        "su - ec2-user -c \"docker run -d --restart=always -e DEBUG=true \
         -e AWS_REGION=us-east-1 -e AWS_ACCESS_KEY_ID=AKIA123 \
         -e AWS_SECRET_ACCESS_KEY=sekret host/app:latest\""
    ));
}

/// Rendering through the trait object works the same
#[test]
fn test_render_through_trait_object() {
    let fleet: Box<dyn UserData> =
        Box::new(ContainerFleet::new(ImageRef::new("host/app")).include_aws_env(false));
    let script = fleet.render(&CredentialContext::default()).unwrap();
    assert!(script.starts_with("#!/bin/bash\n"));
}

//! Container-fleet user-data template
//!
//! Renders a boot script that installs Docker and the AWS CLI for the
//! target OS family, logs into ECR, pulls an image, and runs it detached.

use tracing::debug;

use super::script::ScriptBuilder;
use super::UserData;
use crate::image::ImageRef;
use crate::os::OsFamily;
use crate::session::CredentialContext;
use crate::shell::quote;
use crate::UserDataError;

/// User the boot script switches to for registry login and container runs
const BOOT_USER: &str = "ec2-user";

/// Template for running one container image on a fleet instance
///
/// # Example
///
/// ```
/// use userdata_rs::{ContainerFleet, CredentialContext, ImageRef, OsFamily, UserData};
///
/// let fleet = ContainerFleet::new(ImageRef::new(
///     "123456789.dkr.ecr.us-east-1.amazonaws.com/warmer",
/// ))
/// .os(OsFamily::AmazonLinux)
/// .env("DEBUG", "true")
/// .cmd("python main.py --concurrency 5");
///
/// let script = fleet.render(&CredentialContext::default()).unwrap();
/// assert!(script.starts_with("#!/bin/bash\n"));
/// ```
#[derive(Debug, Clone)]
pub struct ContainerFleet {
    image: ImageRef,
    os: OsFamily,
    env: Vec<(String, String)>,
    cmd: String,
    include_aws_env: bool,
}

impl ContainerFleet {
    /// Create a template with defaults: Amazon Linux, no environment, no
    /// command override, AWS credentials injected into the container
    pub fn new(image: ImageRef) -> Self {
        Self {
            image,
            os: OsFamily::default(),
            env: Vec::new(),
            cmd: String::new(),
            include_aws_env: true,
        }
    }

    /// Set the target OS family
    pub fn os(mut self, os: OsFamily) -> Self {
        self.os = os;
        self
    }

    /// Append one container environment variable
    ///
    /// Entries keep their insertion order in the rendered flags, and
    /// explicit entries always win over injected credentials.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Append several container environment variables
    pub fn envs<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Override the container command
    ///
    /// The value is a full command line appended verbatim after the
    /// image; the image's built-in entrypoint is cleared so the override
    /// is total. Empty (the default) keeps the image's own entrypoint
    /// and command.
    pub fn cmd(mut self, cmd: impl Into<String>) -> Self {
        self.cmd = cmd.into();
        self
    }

    /// Control credential injection into the container environment
    pub fn include_aws_env(mut self, include: bool) -> Self {
        self.include_aws_env = include;
        self
    }

    /// Environment entries for `docker run`, credentials injected last
    fn runtime_env(&self, credentials: &CredentialContext) -> Vec<(String, String)> {
        let mut env = self.env.clone();
        if self.include_aws_env {
            push_if_absent(&mut env, "AWS_REGION", credentials.region.as_deref());
            push_if_absent(&mut env, "AWS_ACCESS_KEY_ID", credentials.access_key.as_deref());
            push_if_absent(
                &mut env,
                "AWS_SECRET_ACCESS_KEY",
                credentials.secret_key.as_deref(),
            );
        }
        env
    }

    /// ECR login pipeline with credentials exported inline
    ///
    /// Absent fields are exported as empty strings; the login then fails
    /// at boot rather than at render, which keeps rendering total.
    fn login_command(&self, credentials: &CredentialContext) -> String {
        let region = quote(credentials.region.as_deref().unwrap_or(""));
        let access_key = quote(credentials.access_key.as_deref().unwrap_or(""));
        let secret_key = quote(credentials.secret_key.as_deref().unwrap_or(""));
        let registry = quote(self.image.registry_host());

        format!(
            "AWS_REGION={region} AWS_ACCESS_KEY_ID={access_key} \
             AWS_SECRET_ACCESS_KEY={secret_key} \
             aws ecr get-login-password --region {region} \
             | docker login --username AWS --password-stdin {registry}"
        )
    }

    /// Detached, always-restart `docker run` command line
    fn run_command(&self, image: &str, env: &[(String, String)]) -> String {
        let mut parts: Vec<String> = ["docker", "run", "-d", "--restart=always"]
            .iter()
            .map(ToString::to_string)
            .collect();

        if !self.cmd.is_empty() {
            parts.push("--entrypoint".to_string());
            parts.push("''".to_string());
        }

        for (key, value) in env {
            parts.push(format!("-e {}={}", quote(key), quote(value)));
        }

        parts.push(quote(image));

        if !self.cmd.is_empty() {
            // Full command line with its own arguments; appended unquoted.
            parts.push(self.cmd.clone());
        }

        parts.join(" ")
    }
}

impl UserData for ContainerFleet {
    fn render(&self, credentials: &CredentialContext) -> Result<String, UserDataError> {
        let install = self.os.bootstrap_commands()?;
        let image = self.image.qualified();

        debug!(image = %image, os = %self.os, "rendering container-fleet user-data");

        let env = self.runtime_env(credentials);
        let login = self.login_command(credentials);
        let pull = format!("docker pull {}", quote(&image));
        let run = self.run_command(&image, &env);

        let mut script = ScriptBuilder::new();
        script.block(["#!/bin/bash", "set -euo pipefail"]);
        script.block(install.iter().copied());
        script.block([
            "# Authenticate to ECR and pull the image".to_string(),
            format!("su - {BOOT_USER} -c \"{login}\""),
            format!("su - {BOOT_USER} -c \"{pull}\""),
        ]);
        script.block([
            "# Run the container in detached mode".to_string(),
            format!("su - {BOOT_USER} -c \"{run}\""),
        ]);

        Ok(script.finish())
    }
}

/// Append `key=value` unless the key is already present or the value absent
fn push_if_absent(env: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };
    if env.iter().any(|(existing, _)| existing == key) {
        return;
    }
    env.push((key.to_string(), value.to_string()));
}

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

const PASSWORD_VAR: &str = "DAGSTER_SECRET_POSTGRESQL_PASSWORD";

/// Run dagster-deploy with no ambient secrets.
fn dagster_deploy() -> Command {
    let mut cmd = cargo_bin_cmd!("dagster-deploy");
    cmd.env_remove(PASSWORD_VAR)
        .env_remove("DAGSTER_SECRET_S3_SECRET_KEY")
        .env_remove("DAGSTER_DEPLOY_DESCRIPTOR")
        .env_remove("DAGSTER_DEPLOY_CONFIG")
        .env_remove("DAGSTER_DEPLOY_LOG");
    cmd
}

const DESCRIPTOR: &str = r#"
secrets = ["S3_SECRET_KEY"]

[image]
repository = "pipelines-dagster"
tag = "latest"

[[deployments]]
name = "pipelines-dagster"
module = "pipelines_dagster.definitions"
port = 4000
"#;

/// Project whose tool paths point at `helm` and `kubectl` inside `dir`.
fn setup_project(dir: &assert_fs::TempDir) {
    dir.child("deploy.toml").write_str(DESCRIPTOR).unwrap();
    dir.child("dagster-deploy.toml")
        .write_str(&format!(
            "[tools]\nhelm = \"{}\"\nkubectl = \"{}\"\n",
            dir.path().join("helm").display(),
            dir.path().join("kubectl").display()
        ))
        .unwrap();
}

// ─── Fail-fast paths (no tools installed) ───────────────────────

#[test]
fn deploy_without_password_never_calls_the_cluster() {
    let dir = assert_fs::TempDir::new().unwrap();
    setup_project(&dir);

    dagster_deploy()
        .current_dir(dir.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Required secret 'postgresqlPassword'"))
        .stderr(predicate::str::contains("Failed to run").not());

    assert!(!dir.path().join(".dagster-deploy/runs.jsonl").exists());
}

#[test]
fn deploy_surfaces_applier_failure() {
    let dir = assert_fs::TempDir::new().unwrap();
    setup_project(&dir);

    dagster_deploy()
        .current_dir(dir.path())
        .env(PASSWORD_VAR, "pw")
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Deployment failed"));

    assert!(!dir.path().join(".dagster-deploy/runs.jsonl").exists());
}

#[test]
fn outputs_before_any_deploy_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    dagster_deploy()
        .current_dir(dir.path())
        .arg("outputs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No recorded deployment"));
}

#[test]
fn history_empty() {
    let dir = assert_fs::TempDir::new().unwrap();

    dagster_deploy()
        .current_dir(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No deployments recorded"));
}

// ─── End to end with fake helm/kubectl ──────────────────────────

#[cfg(unix)]
mod with_fake_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const FAKE_HELM: &str = r#"#!/bin/sh
dir=$(dirname "$0")
echo "$@" > "$dir/helm-args.txt"
while [ $# -gt 0 ]; do
  if [ "$1" = "--values" ]; then cp "$2" "$dir/submitted-values.json"; fi
  shift
done
"#;

    const FAKE_KUBECTL: &str = r#"#!/bin/sh
dir=$(dirname "$0")
echo "$@" >> "$dir/kubectl-calls.txt"
case "$*" in
  "get namespace"*) ;;
  "get services"*) echo '{"items":[{"apiVersion":"v1","kind":"Service","metadata":{"name":"dagster-dagster-webserver","namespace":"dagster"}}]}' ;;
  *) exit 0 ;;
esac
"#;

    fn install_tool(dir: &assert_fs::TempDir, name: &str, script: &str) {
        let path = dir.path().join(name);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn project_with_tools(kubectl: &str) -> assert_fs::TempDir {
        let dir = assert_fs::TempDir::new().unwrap();
        setup_project(&dir);
        install_tool(&dir, "helm", FAKE_HELM);
        install_tool(&dir, "kubectl", kubectl);
        dir
    }

    fn deployed_project() -> assert_fs::TempDir {
        let dir = project_with_tools(FAKE_KUBECTL);

        dagster_deploy()
            .current_dir(dir.path())
            .env(PASSWORD_VAR, "hunter2-db")
            .env("DAGSTER_SECRET_S3_SECRET_KEY", "abc")
            .arg("deploy")
            .assert()
            .success()
            .stdout(predicate::str::contains("dagster-dagster-webserver"));

        dir
    }

    #[test]
    fn deploy_creates_namespace_then_installs_pinned_chart() {
        let dir = deployed_project();

        let kubectl = std::fs::read_to_string(dir.path().join("kubectl-calls.txt")).unwrap();
        let calls: Vec<&str> = kubectl.lines().collect();
        assert_eq!(calls[0], "get namespace dagster --ignore-not-found -o name");
        assert_eq!(calls[1], "create namespace dagster");

        let helm = std::fs::read_to_string(dir.path().join("helm-args.txt")).unwrap();
        assert!(helm.starts_with("upgrade --install dagster dagster"));
        assert!(helm.contains("--repo https://dagster-io.github.io/helm"));
        assert!(helm.contains("--version 1.12.8"));
        assert!(helm.contains("--namespace dagster"));
        assert!(helm.contains("--wait"));
        assert!(!helm.contains("hunter2-db"), "secrets must not appear on the command line");
    }

    #[test]
    fn deploy_submits_composed_values() {
        let dir = deployed_project();

        let raw = std::fs::read_to_string(dir.path().join("submitted-values.json")).unwrap();
        let values: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(values["postgresql"]["postgresqlPassword"], "hunter2-db");
        let worker = &values["dagster-user-deployments"]["deployments"][0];
        assert_eq!(worker["env"]["S3_SECRET_KEY"], "abc");
        assert_eq!(
            worker["dagsterApiGrpcArgs"],
            serde_json::json!(["-m", "pipelines_dagster.definitions"])
        );
    }

    #[test]
    fn outputs_are_recorded_and_queryable() {
        let dir = deployed_project();

        dagster_deploy()
            .current_dir(dir.path())
            .args(["outputs", "webserver_service_name"])
            .assert()
            .success()
            .stdout("dagster-dagster-webserver\n");

        dagster_deploy()
            .current_dir(dir.path())
            .args(["outputs", "dagster_namespace"])
            .assert()
            .success()
            .stdout("dagster\n");

        dagster_deploy()
            .current_dir(dir.path())
            .arg("outputs")
            .assert()
            .success()
            .stdout(predicate::str::contains("webserver_service_name"))
            .stdout(predicate::str::contains("1.12.8"));
    }

    #[test]
    fn unknown_output_lists_available() {
        let dir = deployed_project();

        dagster_deploy()
            .current_dir(dir.path())
            .args(["outputs", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("dagster_namespace, webserver_service_name"));
    }

    #[test]
    fn history_lists_each_deploy() {
        let dir = deployed_project();

        dagster_deploy()
            .current_dir(dir.path())
            .env(PASSWORD_VAR, "pw")
            .args(["deploy", "--no-wait"])
            .assert()
            .success();

        dagster_deploy()
            .current_dir(dir.path())
            .arg("history")
            .assert()
            .success()
            .stdout(predicate::str::contains("2 entries"));

        dagster_deploy()
            .current_dir(dir.path())
            .args(["history", "--last", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 entries"));

        let helm = std::fs::read_to_string(dir.path().join("helm-args.txt")).unwrap();
        assert!(!helm.contains("--wait"));
    }

    #[test]
    fn unreachable_cluster_error_reaches_the_user() {
        let dir = project_with_tools(
            r#"#!/bin/sh
case "$*" in
  "get namespace"*) echo "Unable to connect to the server: dial tcp 10.0.0.1:6443: i/o timeout" >&2; exit 1 ;;
  "create namespace"*) echo 'Error from server (AlreadyExists): namespaces "dagster" already exists' >&2; exit 1 ;;
  *) exit 0 ;;
esac
"#,
        );

        dagster_deploy()
            .current_dir(dir.path())
            .env(PASSWORD_VAR, "pw")
            .arg("deploy")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unable to connect to the server"))
            .stderr(predicate::str::contains("AlreadyExists").not());

        assert!(!dir.path().join("helm-args.txt").exists());
    }

    #[test]
    fn deploy_warns_about_secrets_deployed_empty() {
        let dir = project_with_tools(FAKE_KUBECTL);

        dagster_deploy()
            .current_dir(dir.path())
            .env(PASSWORD_VAR, "pw")
            .arg("--quiet")
            .arg("deploy")
            .assert()
            .success()
            .stdout(predicate::str::contains("Secret 'S3_SECRET_KEY' not configured"));
    }

    #[test]
    fn failed_history_write_fails_the_deploy() {
        let dir = project_with_tools(FAKE_KUBECTL);
        dir.child(".dagster-deploy").write_str("not a directory").unwrap();

        dagster_deploy()
            .current_dir(dir.path())
            .env(PASSWORD_VAR, "pw")
            .arg("deploy")
            .assert()
            .failure()
            .stdout(predicate::str::contains("dagster-dagster-webserver"))
            .stderr(predicate::str::contains("Cannot open run history"));
    }
}

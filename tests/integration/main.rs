//! Integration tests for pomlens

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const TREE_OUTPUT: &str = "\
[INFO] Scanning for projects...
[INFO] --- maven-dependency-plugin:3.6.0:tree (default-cli) @ app ---
[INFO] com.example:app:jar:1.0
[INFO] +- org.slf4j:slf4j-api:jar:2.0.9:compile
[INFO] \\- junit:junit:jar:4.13.2:test
[INFO]    \\- (org.hamcrest:hamcrest-core:jar:1.3:test - omitted for duplicate)
[INFO] BUILD SUCCESS
";

    const LIST_OUTPUT: &str = "\
[INFO] The following files have been resolved:
[INFO]    org.slf4j:slf4j-api:jar:2.0.9:compile
[INFO]    junit:junit:jar:4.13.2:test
[INFO]    org.slf4j:slf4j-api:jar:2.0.9:compile
";

    /// Isolated environment: no user config, private cache dir
    struct Env {
        temp: TempDir,
    }

    impl Env {
        fn new() -> Self {
            Self {
                temp: TempDir::new().unwrap(),
            }
        }

        fn path(&self) -> &Path {
            self.temp.path()
        }

        fn pom(&self) -> PathBuf {
            let pom = self.path().join("pom.xml");
            std::fs::write(&pom, "<project/>").unwrap();
            pom
        }

        fn write_config(&self, body: &str) {
            std::fs::write(self.path().join("config.toml"), body).unwrap();
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("pomlens");
            cmd.current_dir(self.path())
                .env("POMLENS_CONFIG", self.path().join("config.toml"))
                .env("POMLENS_CACHE_DIR", self.path().join("cache"))
                .env_remove("RUST_LOG")
                .arg("--no-local");
            cmd
        }
    }

    #[test]
    fn help_displays() {
        Env::new()
            .cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("cached Maven dependency insight"));
    }

    #[test]
    fn version_displays() {
        Env::new()
            .cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pomlens"));
    }

    #[test]
    fn config_path() {
        let env = Env::new();
        env.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let env = Env::new();
        env.write_config("[maven]\nexecutable = \"./mvnw\"\n");
        env.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"))
            .stdout(predicate::str::contains("./mvnw"));
    }

    #[test]
    fn invalid_config_fails_with_hint() {
        let env = Env::new();
        env.write_config("[cache]\nttl_secs = \"soon\"\n");
        env.cmd()
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn parse_tree_to_json() {
        let env = Env::new();
        let input = env.path().join("tree.txt");
        std::fs::write(&input, TREE_OUTPUT).unwrap();

        env.cmd()
            .args(["parse", "tree"])
            .arg(&input)
            .args(["--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"artifactId\": \"app\""))
            .stdout(predicate::str::contains("\"omittedReason\": \"duplicate\""))
            .stdout(predicate::str::contains("Scanning").not());
    }

    #[test]
    fn parse_tree_redraws() {
        let env = Env::new();
        env.cmd()
            .args(["parse", "tree", "-", "--format", "table"])
            .write_stdin(TREE_OUTPUT)
            .assert()
            .success()
            .stdout(predicate::str::contains("+- org.slf4j:slf4j-api:jar:2.0.9:compile"))
            .stdout(predicate::str::contains("[INFO]").not());
    }

    #[test]
    fn parse_list_dedups() {
        let env = Env::new();
        let output = env
            .cmd()
            .args(["parse", "list", "--format", "plain"])
            .write_stdin(LIST_OUTPUT)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            [
                "org.slf4j:slf4j-api:jar:2.0.9:compile",
                "junit:junit:jar:4.13.2:test"
            ]
        );
    }

    #[test]
    fn parse_missing_file() {
        Env::new()
            .cmd()
            .args(["parse", "tree", "/nonexistent/tree.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn cache_stats_empty() {
        Env::new()
            .cmd()
            .args(["cache", "stats", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("small-persistent 0"))
            .stdout(predicate::str::contains("blob 0"));
    }

    #[test]
    fn cache_clear_on_empty_cache() {
        Env::new()
            .cmd()
            .args(["cache", "clear"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache cleared"));
    }

    #[test]
    fn tree_missing_pom() {
        Env::new()
            .cmd()
            .args(["tree", "--pom", "absent.xml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn tree_missing_maven() {
        let env = Env::new();
        env.pom();
        env.write_config("[maven]\nexecutable = \"pomlens-no-such-mvn\"\n");
        env.cmd()
            .arg("tree")
            .assert()
            .failure()
            .stderr(predicate::str::contains("add it to PATH"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[cfg(unix)]
    fn fake_maven(env: &Env, stdout: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let output = env.path().join("output.txt");
        std::fs::write(&output, stdout).unwrap();
        let script = env.path().join("fake-mvn");
        std::fs::write(
            &script,
            format!("#!/bin/sh\ncat '{}'\n", output.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn tree_served_from_cache_across_runs() {
        let env = Env::new();
        env.pom();
        let script = fake_maven(&env, TREE_OUTPUT);
        env.write_config(&format!("[maven]\nexecutable = \"{}\"\n", script.display()));

        env.cmd()
            .args(["tree", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"artifactId\": \"slf4j-api\""));

        // Maven gone: the persisted entry must answer
        std::fs::remove_file(&script).unwrap();
        env.cmd()
            .args(["tree", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("com.example:app:1.0"));

        env.cmd()
            .args(["cache", "stats", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("small-persistent 1"));

        // Refresh bypasses the cache and surfaces the failure
        env.cmd()
            .args(["tree", "--refresh"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[cfg(unix)]
    #[test]
    fn list_then_invalidate() {
        let env = Env::new();
        env.pom();
        let script = fake_maven(&env, LIST_OUTPUT);
        env.write_config(&format!("[maven]\nexecutable = \"{}\"\n", script.display()));

        env.cmd()
            .args(["list", "--format", "table"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ARTIFACT"))
            .stdout(predicate::str::contains("2 dependencies"));

        env.cmd()
            .args(["cache", "invalidate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache invalidated"));

        env.cmd()
            .args(["cache", "stats", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("small-persistent 0"));
    }

    #[test]
    fn completions_generate() {
        Env::new()
            .cmd()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pomlens"));
    }
}

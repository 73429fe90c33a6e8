//! Plan command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_lists_build_parameters() {
  let env = TestEnv::new();

  env
    .alps_cmd()
    .args(["plan", "--prefix", "/x/alps"])
    .assert()
    .success()
    .stdout(predicate::str::contains("CMAKE_INSTALL_PREFIX = /x/alps"))
    .stdout(predicate::str::contains("Boost_ROOT_DIR"))
    .stdout(predicate::str::contains(
      "https://archives.boost.io/release/1.81.0/source/boost_1_81_0.tar.gz",
    ));
}

#[test]
fn plan_touches_nothing() {
  let env = TestEnv::new();

  env.alps_cmd().arg("plan").assert().success();

  assert!(!env.work_dir().exists());
  assert!(env.cmake_calls().is_empty());
}

#[test]
fn plan_json_is_machine_readable() {
  let env = TestEnv::new();

  let output = env
    .alps_cmd()
    .args(["plan", "--output", "json", "--jobs", "6"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(plan["jobs"], 6);
  assert_eq!(
    plan["artifact_url"],
    "https://archives.boost.io/release/1.81.0/source/boost_1_81_0.tar.gz"
  );
}

#[test]
fn work_dir_flag_overrides_config() {
  let env = TestEnv::new();
  let elsewhere = env.temp.path().join("elsewhere");

  env
    .alps_cmd()
    .arg("plan")
    .arg("--work-dir")
    .arg(&elsewhere)
    .assert()
    .success()
    .stdout(predicate::str::contains(elsewhere.join("alps-build").display().to_string()));
}

#[test]
fn env_var_overrides_config_file() {
  let env = TestEnv::new();

  env
    .alps_cmd()
    .env("ALPS_SETUP_PREFIX", "/from/env/alps")
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("CMAKE_INSTALL_PREFIX = /from/env/alps"));
}

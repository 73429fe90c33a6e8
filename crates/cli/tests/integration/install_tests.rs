//! Install command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn install_with_yes_runs_every_phase_in_order() {
  let env = TestEnv::new();

  env
    .alps_cmd()
    .args(["install", "--yes", "--jobs", "3"])
    .assert()
    .success()
    .stdout(predicate::str::contains("ALPS installed!"));

  let calls = env.cmake_calls();
  assert_eq!(calls.len(), 4, "cmake calls: {:?}", calls);
  assert!(calls[0].starts_with("-S "));
  assert!(calls[1].starts_with("--build ") && calls[1].ends_with("-j 3"));
  assert!(calls[2].starts_with("--build ") && calls[2].ends_with("-t test"));
  assert!(calls[3].starts_with("--install "));
  assert!(env.work_dir().join("install").join("alps").is_dir());
  assert!(env.work_dir().join("alps-build").is_dir());
}

#[test]
fn answering_y_proceeds() {
  let env = TestEnv::new();

  env
    .alps_cmd()
    .arg("install")
    .write_stdin(" Y \n")
    .assert()
    .success()
    .stderr(predicate::str::contains("Confirm Building Configurations?"));

  assert_eq!(env.cmake_calls().len(), 4);
}

#[test]
fn declining_exits_with_abort_code_before_building() {
  for answer in ["n\n", "", "yes\n"] {
    let env = TestEnv::new();

    env
      .alps_cmd()
      .arg("install")
      .write_stdin(answer)
      .assert()
      .code(3)
      .stderr(predicate::str::contains("Exiting due to unexpected configuration"));

    let calls = env.cmake_calls();
    assert_eq!(calls.len(), 1, "answer {:?} ran {:?}", answer, calls);
    assert!(calls[0].starts_with("-S "));
  }
}

#[test]
fn configure_parameters_reach_cmake() {
  let env = TestEnv::new();

  env.alps_cmd().args(["install", "--yes"]).assert().success();

  let configure = &env.cmake_calls()[0];
  assert!(configure.contains("-DCMAKE_CXX_STANDARD=11"));
  assert!(configure.contains("-DBOOST_NO_AUTO_PTR"));
  assert!(configure.contains("boost_1_81_0/stage/lib:/z/lib"));
}

#[test]
fn failing_build_stops_before_test_and_install() {
  let env = TestEnv::with_cmake("case \"$*\" in *' -j '*) exit 2;; esac");

  env
    .alps_cmd()
    .args(["install", "--yes"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("build phase failed"));

  let calls = env.cmake_calls();
  assert_eq!(calls.len(), 2, "cmake calls: {:?}", calls);
  assert!(!calls.iter().any(|c| c.ends_with("-t test") || c.starts_with("--install")));
}

#[test]
fn failing_configure_never_prompts() {
  let env = TestEnv::with_cmake("case \"$1\" in -S) exit 1;; esac");

  env
    .alps_cmd()
    .arg("install")
    .write_stdin("y\n")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("build configuration failed"))
    .stderr(predicate::str::contains("Confirm Building Configurations?").not());
}

#[test]
fn hung_tool_is_killed_by_timeout() {
  let env = TestEnv::with_cmake("exec sleep 30");

  env
    .alps_cmd()
    .args(["install", "--yes", "--timeout", "500ms"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("timed out"));
}

#[test]
fn rerun_reuses_existing_trees() {
  let env = TestEnv::new();

  env.alps_cmd().args(["install", "--yes"]).assert().success();
  std::fs::create_dir_all(env.work_dir().join("alps-src")).unwrap();
  std::fs::create_dir_all(env.work_dir().join("boost_1_81_0")).unwrap();

  env
    .alps_cmd()
    .args(["install", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("updated"))
    .stdout(predicate::str::contains("cached"));
}

#[test]
fn failed_download_leaves_no_archive_behind() {
  // Like `wget -O`, the stub creates its output before failing.
  let env = TestEnv::with_downloader(": > \"$2\"; exit 4");

  env
    .alps_cmd()
    .args(["install", "--yes"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to download"));

  assert!(!env.archive().exists());
  assert!(env.cmake_calls().is_empty());
}

//! Fixed values the installer falls back to when nothing else is configured.

pub const APP_NAME: &str = "alps-setup";

/// Pinned Boost release the ALPS build is known to work against.
pub const BOOST_NAME: &str = "boost";
pub const BOOST_VERSION: &str = "1.81.0";
pub const BOOST_HOST: &str = "boost.io";

pub const ALPS_REPOSITORY: &str = "https://github.com/alpsim/ALPS";
pub const SOURCE_DIR_NAME: &str = "alps-src";
pub const BUILD_DIR_NAME: &str = "alps-build";
pub const WORK_DIR_NAME: &str = "ALPSLib";

pub const PROVISION_PACKAGES: &[&str] = &["numpy", "scipy"];

pub const SDK_CONTAINER: &str = "/Library/Developer/CommandLineTools/SDKs";
pub const PINNED_SDK: &str = "MacOSX14.sdk";
pub const SDK_PREFIX: &str = "MacOSX";
pub const SDK_SUFFIX: &str = ".sdk";

pub const CXX_STANDARD: &str = "11";
pub const CXX_FLAGS: &str =
  "-std=c++11 -stdlib=libc++ -DBOOST_NO_AUTO_PTR -DBOOST_FILESYSTEM_NO_CXX20_ATOMIC_REF";

/// Exit status for an operator-declined confirmation.
pub const EXIT_ABORTED: u8 = 3;
/// Exit status for any failed stage.
pub const EXIT_FAILURE: u8 = 1;

pub const ENV_CONFIG: &str = "ALPS_SETUP_CONFIG";
pub const ENV_WORK_DIR: &str = "ALPS_SETUP_WORK_DIR";
pub const ENV_PREFIX: &str = "ALPS_SETUP_PREFIX";

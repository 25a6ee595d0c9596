#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Each [`TestApp`] owns its own scratch directories, so tests never share
//! state and can run in parallel.

#![allow(dead_code)]

use std::sync::Arc;

use menu_link_group::config::Config;
use menu_link_group::config_storage::{FileGroupStorage, GroupStorage};
use menu_link_group::menu::discovery::rebuild;
use menu_link_group::{GroupLinkDeriver, MenuLinkTree};
use menu_link_group_test_utils::{TempDir, TestGroup, standard_admin_links_yaml};

/// Directories and storage of one test run.
pub struct TestApp {
    pub config: Config,
    pub storage: Arc<FileGroupStorage>,
    root: TempDir,
}

impl TestApp {
    /// Create an app with the stock admin links and no groups.
    pub fn new() -> Self {
        let root = TempDir::new("app").expect("failed to create temp dir");

        for (name, yaml) in standard_admin_links_yaml().expect("failed to render links") {
            root.write(&format!("menu_links/{name}"), &yaml)
                .expect("failed to write links file");
        }

        let config = Config {
            menu_links_dir: root.path().join("menu_links"),
            active_config_dir: root.path().join("config/active"),
            sync_config_dir: root.path().join("config/sync"),
        };
        std::fs::create_dir_all(&config.sync_config_dir).expect("failed to create sync dir");

        let storage = Arc::new(FileGroupStorage::new(config.active_config_dir.clone()));

        Self {
            config,
            storage,
            root,
        }
    }

    /// Storage as the trait object the form and discovery take.
    pub fn storage(&self) -> Arc<dyn GroupStorage> {
        self.storage.clone()
    }

    /// Provider links only, before any group is applied.
    pub async fn base_links(&self) -> MenuLinkTree {
        MenuLinkTree::load_links_dir(&self.config.menu_links_dir)
            .await
            .expect("failed to load menu links")
    }

    /// The menu tree with every enabled stored group applied.
    pub async fn tree(&self) -> MenuLinkTree {
        rebuild(self.storage.as_ref(), self.base_links().await, &GroupLinkDeriver::default())
            .await
            .expect("failed to rebuild menu tree")
    }

    /// Write a group file into the sync directory.
    pub fn write_sync(&self, group: &TestGroup) {
        let yaml = group.to_yaml().expect("failed to render group");
        std::fs::write(self.config.sync_config_dir.join(group.filename()), yaml)
            .expect("failed to write sync file");
    }

    /// Write a raw file into the sync directory.
    pub fn write_sync_raw(&self, name: &str, contents: &str) {
        std::fs::write(self.config.sync_config_dir.join(name), contents)
            .expect("failed to write sync file");
    }

    /// Names of the files in the sync directory, sorted.
    pub fn sync_files(&self) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(&self.config.sync_config_dir)
            .expect("failed to read sync dir")
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

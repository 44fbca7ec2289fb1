// ── Temporary model guard ──

use std::ops::{Deref, DerefMut};

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::CoreError;
use crate::juju::{AddModelOptions, Juju};

/// A freshly added model that is destroyed (storage included, forced) when
/// the guard is dropped, unless `keep` was set.
///
/// Derefs to a [`Juju`] targeting the new model.
#[derive(Debug)]
pub struct TempModel {
    juju: Juju,
    keep: bool,
}

impl TempModel {
    /// Add a `jubilant-xxxxxxxx` model using a clone of `juju`.
    pub fn create(juju: &Juju, keep: bool, controller: Option<&str>) -> Result<Self, CoreError> {
        let name = random_model_name();
        let mut juju = juju.clone();
        juju.add_model(
            &name,
            &AddModelOptions {
                controller: controller.map(str::to_owned),
                ..AddModelOptions::default()
            },
        )?;
        info!(model = %name, keep, "temporary model added");
        Ok(Self { juju, keep })
    }

    pub fn keep(&self) -> bool {
        self.keep
    }
}

impl Deref for TempModel {
    type Target = Juju;

    fn deref(&self) -> &Juju {
        &self.juju
    }
}

impl DerefMut for TempModel {
    fn deref_mut(&mut self) -> &mut Juju {
        &mut self.juju
    }
}

impl Drop for TempModel {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        let Some(model) = self.juju.model().map(str::to_owned) else {
            return;
        };
        if let Err(e) = self.juju.destroy_model(&model, true, true) {
            warn!(model = %model, error = %e, "failed to destroy temporary model");
        }
    }
}

fn random_model_name() -> String {
    let id: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("jubilant-{id}")
}

impl Juju {
    /// Add a throwaway model; see [`TempModel`].
    pub fn temp_model(&self, keep: bool, controller: Option<&str>) -> Result<TempModel, CoreError> {
        TempModel::create(self, keep, controller)
    }
}

//! Read-only snapshot provider over the local Docker engine.
//!
//! [`DockerClient`] enumerates containers (including stopped ones), images,
//! networks and volumes through the engine API and maps each row into an
//! [`EntityRecord`]. Rows missing the fields a record needs are skipped with
//! a warning rather than aborting the whole snapshot. An unreachable engine
//! surfaces as an error; the scheduler retries on the next tick.

use bollard::Docker;
use bollard::container::ListContainersOptions;
use bollard::image::ListImagesOptions;
use bollard::models::{ContainerSummary, ImageSummary, Network, Volume};
use bollard::network::ListNetworksOptions;
use bollard::volume::ListVolumesOptions;

use crate::entity::{
    ContainerRecord, ContainerStatus, EntityClass, EntityRecord, Health, ImageRecord,
    NetworkRecord, Snapshot, VolumeRecord,
};

mod error;

pub use error::{Error, Result};

const SHORT_ID_LEN: usize = 12;

/// Queries the engine for the current snapshot of one entity class.
pub trait SnapshotProvider {
    fn fetch(
        &self,
        class: EntityClass,
    ) -> impl std::future::Future<Output = Result<Snapshot>> + Send;
}

/// [`SnapshotProvider`] backed by the local engine socket.
#[derive(Debug, Clone)]
pub struct DockerClient {
    docker: Docker,
}

impl DockerClient {
    /// Connects using the platform's default engine endpoint
    /// (`/var/run/docker.sock`, or `DOCKER_HOST` when set).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] if no endpoint can be constructed. The
    /// connection itself is lazy; a stopped engine shows up as a fetch error.
    pub fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults().map_err(Error::Connect)?;
        Ok(Self { docker })
    }

    async fn fetch_containers(&self) -> Result<Snapshot> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };
        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|source| Error::List {
                class: EntityClass::Container,
                source,
            })?;
        Ok(collect_records(summaries, EntityClass::Container, container_record))
    }

    async fn fetch_images(&self) -> Result<Snapshot> {
        let summaries = self
            .docker
            .list_images(None::<ListImagesOptions<String>>)
            .await
            .map_err(|source| Error::List {
                class: EntityClass::Image,
                source,
            })?;
        Ok(collect_records(summaries, EntityClass::Image, |s| {
            Some(image_record(s))
        }))
    }

    async fn fetch_networks(&self) -> Result<Snapshot> {
        let networks = self
            .docker
            .list_networks(None::<ListNetworksOptions<String>>)
            .await
            .map_err(|source| Error::List {
                class: EntityClass::Network,
                source,
            })?;
        Ok(collect_records(networks, EntityClass::Network, network_record))
    }

    async fn fetch_volumes(&self) -> Result<Snapshot> {
        let response = self
            .docker
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await
            .map_err(|source| Error::List {
                class: EntityClass::Volume,
                source,
            })?;
        let volumes = response.volumes.unwrap_or_default();
        Ok(collect_records(volumes, EntityClass::Volume, |v| {
            Some(volume_record(v))
        }))
    }
}

impl SnapshotProvider for DockerClient {
    async fn fetch(&self, class: EntityClass) -> Result<Snapshot> {
        match class {
            EntityClass::Container => self.fetch_containers().await,
            EntityClass::Image => self.fetch_images().await,
            EntityClass::Network => self.fetch_networks().await,
            EntityClass::Volume => self.fetch_volumes().await,
        }
    }
}

/// Maps engine rows into a snapshot, skipping rows the mapper rejects.
fn collect_records<T>(
    rows: Vec<T>,
    class: EntityClass,
    map: impl Fn(T) -> Option<EntityRecord>,
) -> Snapshot {
    let total = rows.len();
    let snapshot: Snapshot = rows.into_iter().filter_map(map).collect();
    if snapshot.len() < total {
        log::warn!(
            "skipped {} malformed {} record(s) from the engine",
            total - snapshot.len(),
            class
        );
    }
    snapshot
}

/// Truncates an engine id (with or without a `sha256:` prefix) to the short
/// form used for identity and display.
fn short_id(id: &str) -> String {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    id.chars().take(SHORT_ID_LEN).collect()
}

fn container_record(summary: ContainerSummary) -> Option<EntityRecord> {
    let id = summary.id?;
    let name = summary
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|name| name.trim_start_matches('/').to_owned())
        .filter(|name| !name.is_empty())?;
    let status: ContainerStatus = summary.state.as_deref()?.parse().ok()?;
    let health = Health::from_status_text(summary.status.as_deref().unwrap_or(""));
    Some(EntityRecord::Container(ContainerRecord {
        name,
        status,
        health,
        id: short_id(&id),
    }))
}

fn image_record(summary: ImageSummary) -> EntityRecord {
    let id = short_id(&summary.id);
    let name = summary
        .repo_tags
        .first()
        .map(|tag| repository_component(tag))
        .filter(|repo| !repo.is_empty() && repo != "<none>")
        .unwrap_or_else(|| id.clone());
    EntityRecord::Image(ImageRecord { id, name })
}

/// Strips the tag suffix from a `repository:tag` reference. The rightmost
/// colon splits, so registry ports (`host:5000/repo`) stay intact.
fn repository_component(tag: &str) -> String {
    match tag.rsplit_once(':') {
        Some((repo, _)) => repo.to_owned(),
        None => tag.to_owned(),
    }
}

fn network_record(network: Network) -> Option<EntityRecord> {
    let name = network.name.filter(|name| !name.is_empty())?;
    Some(EntityRecord::Network(NetworkRecord { name }))
}

fn volume_record(volume: Volume) -> EntityRecord {
    EntityRecord::Volume(VolumeRecord {
        id: short_id(&volume.name),
    })
}

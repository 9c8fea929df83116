/*!
 * Keep the clusters up to date as the marker list and the map viewport change.
 *
 * Clustering is only redone in response to two events: the marker list finished reloading, or the
 * viewport settled after a pan or zoom. Nothing is recomputed while a gesture is in progress, the
 * caller is responsible for only reporting settled viewports.
 */
use crate::{
    cluster::{Cluster, ClusterList},
    marker::Marker,
    viewport::{ClusterConfig, Viewport},
    ErrorMapError, ErrorMapResult,
};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

const CHANNEL_SIZE: usize = 16;

/// The state needed to produce clusters for the map, passed explicitly through the two events.
#[derive(Debug, Clone)]
pub struct ClusterSession {
    config: ClusterConfig,
    markers: Vec<Marker>,
    viewport: Option<Viewport>,
    clusters: Option<ClusterList>,
}

impl ClusterSession {
    pub fn new(config: ClusterConfig) -> Self {
        ClusterSession {
            config,
            markers: vec![],
            viewport: None,
            clusters: None,
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The last settled viewport.
    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// The marker list finished reloading.
    ///
    /// The old markers are replaced wholesale. Returns true if the clusters were recomputed, which
    /// only happens once a viewport is known.
    pub fn markers_reloaded(&mut self, markers: Vec<Marker>) -> bool {
        self.markers = markers;

        match self.viewport {
            Some(vp) => {
                self.recompute(vp);
                true
            }
            None => {
                log::trace!("markers reloaded before any viewport, deferring clustering");
                false
            }
        }
    }

    /// The viewport settled after a pan or zoom.
    ///
    /// Returns true if the clusters were recomputed. A pan that leaves the zoom level (latitude
    /// span) materially unchanged from the one the current clusters were built for keeps them.
    /// The kept [ClusterList] still carries the viewport it was computed for, only
    /// [ClusterSession::viewport] follows the pan.
    pub fn viewport_settled(&mut self, viewport: Viewport) -> bool {
        let needs_recompute = match &self.clusters {
            Some(list) => self
                .config
                .is_material_change(list.viewport.latitude_delta, viewport.latitude_delta),
            None => true,
        };

        if needs_recompute {
            self.recompute(viewport);
        } else {
            log::trace!(
                "latitude delta {} unchanged enough, keeping clusters",
                viewport.latitude_delta
            );
            self.viewport = Some(viewport);
        }

        needs_recompute
    }

    fn recompute(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.clusters = Some(ClusterList::from_markers(
            &self.markers,
            &viewport,
            &self.config,
        ));
    }

    /// The most recent clustering result, if any has been computed.
    pub fn cluster_list(&self) -> Option<&ClusterList> {
        self.clusters.as_ref()
    }

    /// The current clusters, empty until both a viewport and markers have arrived.
    pub fn clusters(&self) -> &[Cluster] {
        self.clusters
            .as_ref()
            .map(|list| list.clusters.as_slice())
            .unwrap_or(&[])
    }

    /// Select a cluster by its position in [ClusterSession::clusters].
    pub fn select(&self, index: usize) -> Option<&Cluster> {
        self.clusters().get(index)
    }
}

/// The two events that trigger clustering.
#[derive(Debug, Clone)]
pub enum ClusterEvent {
    MarkersReloaded(Vec<Marker>),
    ViewportSettled(Viewport),
}

/// A clustering result published by a [ClusterWorker].
#[derive(Debug, Clone)]
pub struct ClusterUpdate {
    /// Increases with every published result, anything older than the last one seen is stale.
    pub generation: u64,
    pub clusters: ClusterList,
}

/**
 * Run a [ClusterSession] on a background thread.
 *
 * Events go in through a bounded channel and each recompute publishes a [ClusterUpdate]. Results
 * are never cancelled, a caller that has already seen a newer generation just drops older ones.
 *
 * Publishing never blocks, so the worker keeps draining events even if nobody reads the results
 * for a while. Use [ClusterWorker::latest] to catch up.
 */
pub struct ClusterWorker {
    to_worker: Sender<ClusterEvent>,
    from_worker: Receiver<ClusterUpdate>,
    handle: JoinHandle<ClusterSession>,
}

impl ClusterWorker {
    /// Start the worker thread.
    pub fn start(config: ClusterConfig) -> ErrorMapResult<Self> {
        let (to_worker, from_caller) = bounded::<ClusterEvent>(CHANNEL_SIZE);
        let (to_caller, from_worker) = unbounded::<ClusterUpdate>();

        let handle = thread::Builder::new()
            .name("errormap-cluster".to_owned())
            .spawn(move || {
                let mut session = ClusterSession::new(config);
                let mut generation = 0;

                for event in from_caller {
                    let recomputed = match event {
                        ClusterEvent::MarkersReloaded(markers) => session.markers_reloaded(markers),
                        ClusterEvent::ViewportSettled(vp) => session.viewport_settled(vp),
                    };

                    if !recomputed {
                        continue;
                    }

                    if let Some(list) = session.cluster_list() {
                        generation += 1;
                        let update = ClusterUpdate {
                            generation,
                            clusters: list.clone(),
                        };

                        if to_caller.send(update).is_err() {
                            log::debug!("cluster results receiver hung up, stopping");
                            break;
                        }
                    }
                }

                session
            })?;

        Ok(ClusterWorker {
            to_worker,
            from_worker,
            handle,
        })
    }

    /// Queue an event for the worker.
    pub fn send(&self, event: ClusterEvent) -> ErrorMapResult<()> {
        self.to_worker.send(event)?;
        Ok(())
    }

    /// Where the clustering results come out.
    pub fn updates(&self) -> &Receiver<ClusterUpdate> {
        &self.from_worker
    }

    /// Block for the next result, skipping straight to the newest one already queued.
    pub fn latest(&self) -> Option<ClusterUpdate> {
        let first = self.from_worker.recv().ok()?;
        Some(self.from_worker.try_iter().fold(first, |newest, upd| {
            if upd.generation > newest.generation {
                upd
            } else {
                newest
            }
        }))
    }

    /// Stop taking events, wait for the thread and hand back its final state.
    pub fn finish(self) -> ErrorMapResult<ClusterSession> {
        let ClusterWorker {
            to_worker,
            from_worker,
            handle,
        } = self;

        drop(to_worker);
        drop(from_worker);

        handle.join().map_err(|_| {
            ErrorMapError {
                msg: "cluster worker panicked",
            }
            .into()
        })
    }
}

use crate::topology::{ClusterTopology, Topology};

type StandaloneHandler<'h, R> = Box<dyn FnOnce() -> R + 'h>;
type ClusterHandler<'t, 'h, R> = Box<dyn FnOnce(&'t ClusterTopology) -> R + 'h>;
type DefaultHandler<'t, 'h, R> = Box<dyn FnOnce(&'t Topology) -> R + 'h>;

/// Per-variant handler table for one operation.
///
/// The handler registered for the active variant runs; otherwise the default
/// handler runs. Running with neither is a missing case in the caller and
/// panics.
pub struct Dispatch<'t, 'h, R> {
    topology: &'t Topology,
    on_standalone: Option<StandaloneHandler<'h, R>>,
    on_cluster: Option<ClusterHandler<'t, 'h, R>>,
    on_default: Option<DefaultHandler<'t, 'h, R>>,
}

impl<'t, 'h, R> Dispatch<'t, 'h, R> {
    pub fn new(topology: &'t Topology) -> Self {
        Self {
            topology,
            on_standalone: None,
            on_cluster: None,
            on_default: None,
        }
    }

    pub fn standalone(mut self, handler: impl FnOnce() -> R + 'h) -> Self {
        self.on_standalone = Some(Box::new(handler));
        self
    }

    pub fn cluster(mut self, handler: impl FnOnce(&'t ClusterTopology) -> R + 'h) -> Self {
        self.on_cluster = Some(Box::new(handler));
        self
    }

    pub fn default_handler(mut self, handler: impl FnOnce(&'t Topology) -> R + 'h) -> Self {
        self.on_default = Some(Box::new(handler));
        self
    }

    pub fn run(self) -> R {
        let topology = self.topology;
        match topology {
            Topology::Standalone => match (self.on_standalone, self.on_default) {
                (Some(handler), _) => handler(),
                (None, Some(fallback)) => fallback(topology),
                (None, None) => missing_handler(topology),
            },
            Topology::Cluster(cluster) => match (self.on_cluster, self.on_default) {
                (Some(handler), _) => handler(cluster),
                (None, Some(fallback)) => fallback(topology),
                (None, None) => missing_handler(topology),
            },
        }
    }
}

fn missing_handler(topology: &Topology) -> ! {
    panic!(
        "no {:?} handler and no default handler registered for this operation",
        topology.kind()
    )
}

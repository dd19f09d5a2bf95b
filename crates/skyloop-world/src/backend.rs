use crate::geometry::TileMesh;

/// Seam between the tile grid and whatever owns drawable geometry.
///
/// The grid releases every handle it uploaded exactly once, before the slot
/// that held it is reused.
pub trait GeometryBackend {
    type Handle;

    fn upload(&mut self, mesh: TileMesh) -> Self::Handle;
    fn release(&mut self, handle: Self::Handle);
}

/// Handle into a [`CpuGeometryBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Keeps uploaded meshes in host memory. Used headless and as the staging
/// store the web bridge reads vertex data from.
#[derive(Debug, Default)]
pub struct CpuGeometryBackend {
    meshes: Vec<Option<TileMesh>>,
    /// Stack of free arena indices.
    free_slots: Vec<u32>,
    uploads: u64,
    releases: u64,
}

impl CpuGeometryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: MeshId) -> Option<&TileMesh> {
        self.meshes.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Meshes currently held.
    pub fn live_count(&self) -> usize {
        self.meshes.len() - self.free_slots.len()
    }

    /// Total uploads since creation.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Total releases since creation.
    pub fn releases(&self) -> u64 {
        self.releases
    }
}

impl GeometryBackend for CpuGeometryBackend {
    type Handle = MeshId;

    fn upload(&mut self, mesh: TileMesh) -> MeshId {
        self.uploads += 1;
        match self.free_slots.pop() {
            Some(slot) => {
                self.meshes[slot as usize] = Some(mesh);
                MeshId(slot)
            }
            None => {
                self.meshes.push(Some(mesh));
                MeshId(self.meshes.len() as u32 - 1)
            }
        }
    }

    fn release(&mut self, handle: MeshId) {
        match self.meshes.get_mut(handle.0 as usize) {
            Some(entry) if entry.is_some() => {
                *entry = None;
                self.free_slots.push(handle.0);
                self.releases += 1;
            }
            _ => log::warn!("release of unknown mesh {}", handle.0),
        }
    }
}

//! Collective communication for the distributed driver.
//!
//! The driver needs exactly two collectives, broadcast and reduce, with rank
//! 0 as the fixed root. [`Communicator`] is that seam. [`SingleProcess`] is
//! the world of one. [`LocalCluster`] runs one rank per thread and moves
//! bincode-encoded messages over channels, so the wire types are exercised
//! for real without an external launcher.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{McbError, McbResult};

/// Rank-0-rooted collectives over serializable values.
pub trait Communicator {
    /// This process's rank in `[0, size)`.
    fn rank(&self) -> usize;

    /// Number of participating processes.
    fn size(&self) -> usize;

    /// Broadcast from rank 0. The root passes `Some(value)`, every other
    /// rank passes `None`; all ranks return the root's value.
    fn broadcast<T>(&mut self, value: Option<T>) -> McbResult<T>
    where
        T: Serialize + DeserializeOwned;

    /// Reduce to rank 0 under an associative, commutative `op`. Returns
    /// `Some` at the root and `None` elsewhere. The root folds contributions
    /// in rank order, so the result does not depend on arrival order.
    fn reduce<T, F>(&mut self, value: T, op: F) -> McbResult<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(T, T) -> T;
}

/// The trivial world: one rank, collectives are identities.
#[derive(Debug, Default)]
pub struct SingleProcess;

impl Communicator for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast<T>(&mut self, value: Option<T>) -> McbResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        value.ok_or_else(|| McbError::Communication("broadcast without a value at the root".into()))
    }

    fn reduce<T, F>(&mut self, value: T, _op: F) -> McbResult<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(T, T) -> T,
    {
        Ok(Some(value))
    }
}

/// One rank of an in-process cluster; see [`LocalCluster::run`].
pub struct ClusterEndpoint {
    rank: usize,
    size: usize,
    /// Root only: one channel pair per non-root rank, position `r - 1`.
    to_peers: Vec<Sender<Vec<u8>>>,
    from_peers: Vec<Receiver<Vec<u8>>>,
    /// Non-root only.
    from_root: Option<Receiver<Vec<u8>>>,
    to_root: Option<Sender<Vec<u8>>>,
}

fn encode<T: Serialize>(value: &T) -> McbResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| McbError::Communication(format!("encode: {e}")))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> McbResult<T> {
    bincode::deserialize(bytes).map_err(|e| McbError::Communication(format!("decode: {e}")))
}

impl Communicator for ClusterEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast<T>(&mut self, value: Option<T>) -> McbResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if self.rank == 0 {
            let value = value.ok_or_else(|| {
                McbError::Communication("broadcast without a value at the root".into())
            })?;
            let bytes = encode(&value)?;
            for tx in &self.to_peers {
                tx.send(bytes.clone())
                    .map_err(|_| McbError::Communication("peer disconnected".into()))?;
            }
            Ok(value)
        } else {
            let rx = self
                .from_root
                .as_ref()
                .ok_or_else(|| McbError::Communication("non-root endpoint without a root channel".into()))?;
            let bytes = rx
                .recv()
                .map_err(|_| McbError::Communication("root disconnected".into()))?;
            decode(&bytes)
        }
    }

    fn reduce<T, F>(&mut self, value: T, op: F) -> McbResult<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(T, T) -> T,
    {
        if self.rank == 0 {
            let mut acc = value;
            for rx in &self.from_peers {
                let bytes = rx
                    .recv()
                    .map_err(|_| McbError::Communication("peer disconnected".into()))?;
                acc = op(acc, decode(&bytes)?);
            }
            Ok(Some(acc))
        } else {
            let tx = self
                .to_root
                .as_ref()
                .ok_or_else(|| McbError::Communication("non-root endpoint without a root channel".into()))?;
            tx.send(encode(&value)?)
                .map_err(|_| McbError::Communication("root disconnected".into()))?;
            Ok(None)
        }
    }
}

/// In-process SPMD harness: every rank runs the same function on its own
/// thread.
pub struct LocalCluster;

impl LocalCluster {
    /// Run `f` on `size` rank threads and return the per-rank results in
    /// rank order.
    pub fn run<R, F>(size: usize, f: F) -> McbResult<Vec<R>>
    where
        R: Send,
        F: Fn(&mut ClusterEndpoint) -> R + Sync,
    {
        if size == 0 {
            return Err(McbError::InvalidInput("cluster size must be at least 1".into()));
        }

        let mut to_peers = Vec::with_capacity(size - 1);
        let mut from_peers = Vec::with_capacity(size - 1);
        let mut peer_ends = Vec::with_capacity(size - 1);
        for _ in 1..size {
            let (root_tx, peer_rx) = unbounded();
            let (peer_tx, root_rx) = unbounded();
            to_peers.push(root_tx);
            from_peers.push(root_rx);
            peer_ends.push((peer_rx, peer_tx));
        }

        let mut endpoints = Vec::with_capacity(size);
        endpoints.push(ClusterEndpoint {
            rank: 0,
            size,
            to_peers,
            from_peers,
            from_root: None,
            to_root: None,
        });
        for (rank, (peer_rx, peer_tx)) in peer_ends.into_iter().enumerate() {
            endpoints.push(ClusterEndpoint {
                rank: rank + 1,
                size,
                to_peers: Vec::new(),
                from_peers: Vec::new(),
                from_root: Some(peer_rx),
                to_root: Some(peer_tx),
            });
        }

        let f = &f;
        let results: Vec<R> = std::thread::scope(|scope| {
            let handles: Vec<_> = endpoints
                .into_iter()
                .map(|mut ep| scope.spawn(move || f(&mut ep)))
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .map_err(|_| McbError::Communication("rank thread panicked".into()))
                })
                .collect::<McbResult<Vec<R>>>()
        })?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_process_collectives() {
        let mut world = SingleProcess;
        assert_eq!(world.size(), 1);
        let v: u32 = world.broadcast(Some(7)).unwrap();
        assert_eq!(v, 7);
        let r = world.reduce(5u32, |a, b| a + b).unwrap();
        assert_eq!(r, Some(5));
    }

    #[test]
    fn test_cluster_broadcast_reaches_all_ranks() {
        let results = LocalCluster::run(4, |world| {
            let value: u64 = if world.rank() == 0 {
                world.broadcast(Some(42)).unwrap()
            } else {
                world.broadcast(None).unwrap()
            };
            value
        })
        .unwrap();
        assert_eq!(results, vec![42, 42, 42, 42]);
    }

    #[test]
    fn test_cluster_reduce_folds_in_rank_order() {
        let results = LocalCluster::run(3, |world| {
            world
                .reduce(vec![world.rank() as u32], |mut a, mut b| {
                    a.append(&mut b);
                    a
                })
                .unwrap()
        })
        .unwrap();
        assert_eq!(results[0], Some(vec![0, 1, 2]));
        assert_eq!(results[1], None);
        assert_eq!(results[2], None);
    }
}

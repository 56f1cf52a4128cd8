//! # cauchy256 — Cauchy MDS erasure coding over GF(256)
//!
//! Encodes `original_count` data blocks into `recovery_count` recovery
//! blocks such that any `original_count` blocks — originals and recoveries
//! in any mix — reconstruct the original data. The generator matrix is a
//! Cauchy matrix normalized so its first row is all ones, which turns the
//! first recovery row (and the single-recovery decode) into plain XOR.
//!
//! The field limits the code to `original_count + recovery_count <= 256`.
//!
//! # Example
//!
//! ```rust
//! use cauchy256::{encode, decode, Block, BlockMut, Params};
//!
//! let params = Params::new(3, 2, 8).unwrap(); // 3 original, 2 recovery, 8 bytes each
//!
//! let originals: Vec<Vec<u8>> = vec![vec![1u8; 8], vec![2u8; 8], vec![3u8; 8]];
//! let blocks: Vec<Block> = originals
//!     .iter()
//!     .enumerate()
//!     .map(|(i, data)| Block::new(i as u8, data))
//!     .collect();
//!
//! let mut recovery = vec![0u8; 2 * 8];
//! encode(&params, &blocks, &mut recovery).unwrap();
//!
//! // Lose original 1; decode from originals 0 and 2 plus the first recovery row.
//! let mut b0 = originals[0].clone();
//! let mut b2 = originals[2].clone();
//! let mut r0 = recovery[..8].to_vec();
//! let mut have = vec![
//!     BlockMut::new(0, &mut b0),
//!     BlockMut::new(3, &mut r0), // recovery row 0 carries index 3
//!     BlockMut::new(2, &mut b2),
//! ];
//! let recovered = decode(&params, &mut have).unwrap();
//! assert_eq!(recovered, vec![1]);
//! assert_eq!(have[1].index, 1);
//! assert_eq!(&have[1].data[..], &originals[1][..]);
//! ```

use std::fmt;

pub mod gf;

pub use gf::Gf256;

use gf::{add2_mem, add_mem, addset_mem, mul_mem, mul_mem_inplace, muladd_mem};

/// Engine version, checked by [`init`]. Callers embed this constant at
/// compile time so that a header/library mismatch is caught up front.
pub const VERSION: u32 = 2;

/// Verify the caller's embedded version and the field tables.
///
/// The field context is const data, so [`encode`] and [`decode`] work
/// without calling this; `init` exists for version negotiation and a
/// one-shot field self-check. Idempotent and safe to call from multiple
/// threads.
pub fn init(version: u32) -> Result<(), Error> {
    if version != VERSION {
        return Err(Error::VersionMismatch);
    }
    if !gf::init() {
        return Err(Error::FieldInitFailed);
    }
    Ok(())
}

/// Error type for encode/decode operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A zero block count or block size
    InvalidParams,
    /// original_count + recovery_count > 256
    TooManyBlocks,
    /// Mis-shaped slice arguments (wrong originals count or output size)
    InvalidInput,
    /// Decode input does not hold exactly original_count blocks
    InsufficientBlocks,
    /// Two original blocks carry the same index
    DuplicateIndex,
    /// Caller's embedded version does not match [`VERSION`]
    VersionMismatch,
    /// The field table self-check failed
    FieldInitFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParams => write!(f, "invalid encoder parameters"),
            Error::TooManyBlocks => write!(f, "original_count + recovery_count > 256"),
            Error::InvalidInput => write!(f, "mis-shaped input or output slice"),
            Error::InsufficientBlocks => write!(f, "decode requires exactly original_count blocks"),
            Error::DuplicateIndex => write!(f, "duplicate original block index"),
            Error::VersionMismatch => write!(f, "caller and engine versions differ"),
            Error::FieldInitFailed => write!(f, "GF(256) table self-check failed"),
        }
    }
}

impl std::error::Error for Error {}

/// Encoder/decoder parameters.
///
/// Construction through [`Params::new`] is the only way to obtain a value,
/// so every `Params` in circulation satisfies `1 <= original_count`,
/// `1 <= recovery_count`, `original_count + recovery_count <= 256`, and
/// `block_bytes >= 1`.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    original_count: usize,
    recovery_count: usize,
    block_bytes: usize,
}

impl Params {
    /// Create new encoder parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if any argument is zero and
    /// [`Error::TooManyBlocks`] if `original_count + recovery_count > 256`.
    pub fn new(
        original_count: usize,
        recovery_count: usize,
        block_bytes: usize,
    ) -> Result<Self, Error> {
        if original_count == 0 || recovery_count == 0 || block_bytes == 0 {
            return Err(Error::InvalidParams);
        }
        if original_count + recovery_count > 256 {
            return Err(Error::TooManyBlocks);
        }
        Ok(Self {
            original_count,
            recovery_count,
            block_bytes,
        })
    }

    #[inline]
    pub fn original_count(&self) -> usize {
        self.original_count
    }

    #[inline]
    pub fn recovery_count(&self) -> usize {
        self.recovery_count
    }

    #[inline]
    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }

    /// Block index carried by an original block.
    #[inline]
    pub fn original_block_index(&self, original_index: usize) -> u8 {
        debug_assert!(original_index < self.original_count);
        original_index as u8
    }

    /// Block index carried by a recovery block.
    #[inline]
    pub fn recovery_block_index(&self, recovery_index: usize) -> u8 {
        debug_assert!(recovery_index < self.recovery_count);
        (self.original_count + recovery_index) as u8
    }
}

/// An immutable block view for encoding.
#[derive(Debug, Clone)]
pub struct Block<'a> {
    /// Block contents, `block_bytes` long
    pub data: &'a [u8],
    /// Row index: `0..original_count` for originals, `original_count..` for
    /// recovery rows
    pub index: u8,
}

impl<'a> Block<'a> {
    #[inline]
    pub fn new(index: u8, data: &'a [u8]) -> Self {
        Self { data, index }
    }

    /// Whether this block carries original data rather than a recovery row.
    #[inline]
    pub fn is_original(&self, params: &Params) -> bool {
        (self.index as usize) < params.original_count
    }
}

/// A mutable block for decoding.
///
/// The decoder rewrites both `data` and `index` in place: on success every
/// block carries an index in `0..original_count` and the matching original
/// bytes.
#[derive(Debug)]
pub struct BlockMut<'a> {
    pub data: &'a mut [u8],
    pub index: u8,
}

impl<'a> BlockMut<'a> {
    #[inline]
    pub fn new(index: u8, data: &'a mut [u8]) -> Self {
        Self { data, index }
    }
}

// =============================================================================
// Cauchy matrix
// =============================================================================

/// Generate one element of the normalized Cauchy matrix:
///
/// ```text
/// a_ij = (y_j + x_0) / (x_i + y_j)
/// ```
///
/// `x_i` is the recovery row index, `x_0 = original_count` (the first
/// recovery row), `y_j` the original column. For `x_i == x_0` this is 1 —
/// the first row is all ones, so encode and decode unroll it as plain XOR
/// instead of calling here.
#[inline]
fn matrix_element(x_i: u8, x_0: u8, y_j: u8) -> Gf256 {
    (Gf256(y_j) + Gf256(x_0)) / (Gf256(x_i) + Gf256(y_j))
}

// =============================================================================
// Encoding
// =============================================================================

/// Produce a single recovery row.
///
/// `originals` must hold the data blocks in row order; `output` receives the
/// recovery block for row `recovery_index` and must be `block_bytes` long.
pub fn encode_block(
    params: &Params,
    originals: &[Block<'_>],
    recovery_index: usize,
    output: &mut [u8],
) {
    debug_assert_eq!(originals.len(), params.original_count);
    debug_assert_eq!(output.len(), params.block_bytes);
    debug_assert!(recovery_index < params.recovery_count);

    // One original: every recovery row is a copy of it.
    if params.original_count == 1 {
        output.copy_from_slice(originals[0].data);
        return;
    }

    // The first row of the matrix is all ones, so row 0 is a parity of the
    // original data.
    if recovery_index == 0 {
        addset_mem(output, originals[0].data, originals[1].data);
        for j in 2..params.original_count {
            add_mem(output, originals[j].data);
        }
        return;
    }

    let x_0 = params.original_count as u8;
    let x_i = (params.original_count + recovery_index) as u8;

    mul_mem(output, originals[0].data, matrix_element(x_i, x_0, 0));
    for j in 1..params.original_count {
        let y_j = j as u8;
        muladd_mem(output, matrix_element(x_i, x_0, y_j), originals[j].data);
    }
}

/// Encode all recovery rows.
///
/// `recovery_output` receives the rows end to end, row 0 first; it must be
/// exactly `recovery_count * block_bytes` long. Nothing is written on error.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `originals` does not hold
/// `original_count` blocks or `recovery_output` has the wrong size.
pub fn encode(
    params: &Params,
    originals: &[Block<'_>],
    recovery_output: &mut [u8],
) -> Result<(), Error> {
    if originals.len() != params.original_count {
        return Err(Error::InvalidInput);
    }
    if recovery_output.len() != params.recovery_count * params.block_bytes {
        return Err(Error::InvalidInput);
    }

    for (recovery_index, output) in recovery_output
        .chunks_exact_mut(params.block_bytes)
        .enumerate()
    {
        encode_block(params, originals, recovery_index, output);
    }

    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Reborrow two distinct entries of a block list at once.
fn block_pair<'s, 'p, 'a>(
    blocks: &'s mut [&'p mut BlockMut<'a>],
    a: usize,
    b: usize,
) -> (&'s mut BlockMut<'a>, &'s mut BlockMut<'a>) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = blocks.split_at_mut(b);
        (&mut *lo[a], &mut *hi[0])
    } else {
        let (lo, hi) = blocks.split_at_mut(a);
        (&mut *hi[0], &mut *lo[b])
    }
}

/// Borrow two distinct rows of the flat `n * n` matrix at once.
fn row_pair(matrix: &mut [u8], n: usize, a: usize, b: usize) -> (&mut [u8], &mut [u8]) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = matrix.split_at_mut(b * n);
        (&mut lo[a * n..(a + 1) * n], &mut hi[..n])
    } else {
        let (lo, hi) = matrix.split_at_mut(a * n);
        (&mut hi[..n], &mut lo[b * n..(b + 1) * n])
    }
}

/// Matrices up to this many bytes live on the stack during decode.
const STACK_MATRIX_BYTES: usize = 2048;

/// Decoder state: the input blocks partitioned by kind, plus the erased
/// original rows the recovery blocks will be resolved into.
struct Decoder<'p, 'a> {
    params: Params,
    /// Recovery blocks in input order; buffers are rewritten in place.
    recovery: Vec<&'p mut BlockMut<'a>>,
    /// Original blocks in input order; read-only during decode.
    original: Vec<&'p mut BlockMut<'a>>,
    /// Missing original rows, ascending. Same length as `recovery`.
    erasures: Vec<u8>,
}

impl<'p, 'a> Decoder<'p, 'a> {
    fn new(params: &Params, blocks: &'p mut [BlockMut<'a>]) -> Result<Self, Error> {
        let k = params.original_count;

        let mut present = [false; 256];
        let mut recovery = Vec::new();
        let mut original = Vec::new();

        for block in blocks.iter_mut() {
            let row = block.index as usize;
            debug_assert!(row < k + params.recovery_count);

            if row < k {
                if present[row] {
                    return Err(Error::DuplicateIndex);
                }
                present[row] = true;
                original.push(block);
            } else {
                recovery.push(block);
            }
        }

        // With exactly k distinct rows in the input, the number of missing
        // originals equals the number of recovery blocks present.
        let mut erasures = Vec::with_capacity(recovery.len());
        for row in 0..k {
            if !present[row] {
                erasures.push(row as u8);
                if erasures.len() == recovery.len() {
                    break;
                }
            }
        }

        Ok(Self {
            params: *params,
            recovery,
            original,
            erasures,
        })
    }

    /// Reconstruction when the code has a single recovery row.
    ///
    /// That row is the parity of all originals, so the one missing block is
    /// the XOR of the parity with every surviving original. Originals are
    /// folded in two at a time.
    fn decode_m1(&mut self) {
        let out = &mut *self.recovery[0];

        let mut pending: Option<&[u8]> = None;
        for orig in &self.original {
            match pending.take() {
                None => pending = Some(&*orig.data),
                Some(first) => add2_mem(out.data, first, &*orig.data),
            }
        }
        if let Some(last) = pending {
            add_mem(out.data, last);
        }

        out.index = self.erasures[0];
    }

    /// General reconstruction: reduce the recovery rows over the surviving
    /// originals, then solve the remaining square system by Gauss-Jordan
    /// elimination, applying every matrix row operation to the recovery
    /// buffers in lock-step.
    fn decode(&mut self) {
        let n = self.recovery.len();
        let x_0 = self.params.original_count as u8;

        // Subtract every surviving original from the recovery rows. What
        // remains in each recovery buffer is a combination of only the
        // missing originals.
        for orig in &self.original {
            for rec in self.recovery.iter_mut() {
                let coeff = matrix_element(rec.index, x_0, orig.index);
                muladd_mem(rec.data, coeff, &*orig.data);
            }
        }

        // The n x n system tying recovery rows to erased columns.
        let mut stack = [0u8; STACK_MATRIX_BYTES];
        let mut heap = Vec::new();
        let matrix: &mut [u8] = if n * n <= STACK_MATRIX_BYTES {
            &mut stack[..n * n]
        } else {
            heap.resize(n * n, 0);
            &mut heap
        };

        let mut slot = 0;
        for rec in &self.recovery {
            for &erased in &self.erasures {
                matrix[slot] = matrix_element(rec.index, x_0, erased).0;
                slot += 1;
            }
        }

        // Gauss-Jordan with a pivot permutation: rows are reordered through
        // `pivots` so block buffers never move.
        let mut pivots: Vec<usize> = (0..n).collect();

        for j in 0..n {
            // Hunt for a usable pivot in this column. One always exists:
            // the submatrix over disjoint Cauchy points is invertible.
            for pivot_slot in j..n {
                let i = pivots[pivot_slot];
                let elem = matrix[i * n + j];
                if elem == 0 {
                    continue;
                }

                pivots[pivot_slot] = pivots[j];
                pivots[j] = i;

                // This recovery block now reconstructs erased row j.
                self.recovery[i].index = self.erasures[j];

                // Scale the pivot row to a unit diagonal. The pivot entry
                // itself is never reread, so it stays unwritten.
                if elem != 1 {
                    let inv = Gf256(1) / Gf256(elem);
                    mul_mem_inplace(&mut matrix[i * n + j + 1..(i + 1) * n], inv);
                    mul_mem_inplace(self.recovery[i].data, inv);
                }

                // Clear column j from every row not yet pivoted, mirroring
                // each row operation onto the block buffers.
                for other_slot in j + 1..n {
                    let other = pivots[other_slot];
                    let coeff = Gf256(matrix[other * n + j]);

                    let (pivot_row, other_row) = row_pair(matrix, n, i, other);
                    muladd_mem(&mut other_row[j + 1..], coeff, &pivot_row[j + 1..]);

                    let (pivot_block, other_block) = block_pair(&mut self.recovery, i, other);
                    muladd_mem(other_block.data, coeff, &*pivot_block.data);
                }

                break;
            }
        }

        // Back-substitute the upper triangle; only the buffers need the
        // updates from here on.
        for j in (0..n - 1).rev() {
            let row = pivots[j];
            for col in (j + 1..n).rev() {
                let coeff = Gf256(matrix[row * n + col]);
                let (target, source) = block_pair(&mut self.recovery, row, pivots[col]);
                muladd_mem(target.data, coeff, &*source.data);
            }
        }
    }
}

/// Recover erased original blocks in place.
///
/// `blocks` must hold exactly `original_count` blocks with distinct indices
/// in `0..original_count + recovery_count`. Recovery blocks are rewritten to
/// carry the reconstructed original data and their `index` fields are
/// relabeled with the recovered rows; surviving originals are untouched.
///
/// Returns the recovered original indices, ascending (empty when nothing was
/// erased).
///
/// # Errors
///
/// Returns [`Error::InsufficientBlocks`] on a wrong block count and
/// [`Error::DuplicateIndex`] if two originals share an index. Indices out of
/// range are not detected (callers own index bookkeeping); a debug build
/// asserts on them.
pub fn decode(params: &Params, blocks: &mut [BlockMut<'_>]) -> Result<Vec<u8>, Error> {
    if blocks.len() != params.original_count {
        return Err(Error::InsufficientBlocks);
    }

    // One original: any single block already carries the data.
    if params.original_count == 1 {
        blocks[0].index = 0;
        return Ok(Vec::new());
    }

    let mut decoder = Decoder::new(params, blocks)?;

    if decoder.erasures.is_empty() {
        return Ok(Vec::new());
    }

    if params.recovery_count == 1 {
        decoder.decode_m1();
    } else {
        decoder.decode();
    }

    Ok(decoder.erasures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_originals(k: usize, block_bytes: usize) -> Vec<Vec<u8>> {
        let mut rng = rand::thread_rng();
        (0..k)
            .map(|_| (0..block_bytes).map(|_| rng.gen()).collect())
            .collect()
    }

    fn encode_all(params: &Params, originals: &[Vec<u8>]) -> Vec<u8> {
        let blocks: Vec<Block> = originals
            .iter()
            .enumerate()
            .map(|(i, data)| Block::new(i as u8, data))
            .collect();
        let mut recovery = vec![0u8; params.recovery_count() * params.block_bytes()];
        encode(params, &blocks, &mut recovery).unwrap();
        recovery
    }

    /// Drop the originals named in `erased` (ascending), stand in the first
    /// `erased.len()` recovery rows, decode, and check that every block ends
    /// up labeled and filled as its original.
    fn assert_roundtrip(params: &Params, originals: &[Vec<u8>], recovery: &[u8], erased: &[usize]) {
        let k = params.original_count();
        let bb = params.block_bytes();
        assert!(erased.len() <= params.recovery_count());

        let mut buffers: Vec<(u8, Vec<u8>)> = Vec::with_capacity(k);
        for (i, data) in originals.iter().enumerate() {
            if !erased.contains(&i) {
                buffers.push((i as u8, data.clone()));
            }
        }
        for r in 0..erased.len() {
            buffers.push(((k + r) as u8, recovery[r * bb..(r + 1) * bb].to_vec()));
        }
        assert_eq!(buffers.len(), k);

        let mut blocks: Vec<BlockMut> = buffers
            .iter_mut()
            .map(|(index, data)| BlockMut::new(*index, data))
            .collect();

        let recovered = decode(params, &mut blocks).unwrap();
        let want: Vec<u8> = erased.iter().map(|&e| e as u8).collect();
        assert_eq!(recovered, want);

        let mut seen = vec![false; k];
        for block in &blocks {
            let row = block.index as usize;
            assert!(row < k, "index {row} not an original row");
            assert!(!seen[row], "row {row} labeled twice");
            seen[row] = true;
            assert_eq!(&block.data[..], &originals[row][..], "row {row} contents");
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_params_creation() {
        let params = Params::new(3, 2, 1024).unwrap();
        assert_eq!(params.original_count(), 3);
        assert_eq!(params.recovery_count(), 2);
        assert_eq!(params.block_bytes(), 1024);
        assert_eq!(params.original_block_index(2), 2);
        assert_eq!(params.recovery_block_index(1), 4);
    }

    #[test]
    fn test_params_invalid() {
        assert_eq!(Params::new(0, 2, 1024).unwrap_err(), Error::InvalidParams);
        assert_eq!(Params::new(3, 0, 1024).unwrap_err(), Error::InvalidParams);
        assert_eq!(Params::new(3, 2, 0).unwrap_err(), Error::InvalidParams);
        assert_eq!(
            Params::new(200, 100, 1024).unwrap_err(),
            Error::TooManyBlocks
        );
        assert!(Params::new(200, 56, 1024).is_ok());
    }

    #[test]
    fn test_init_version_check() {
        assert_eq!(init(VERSION + 1), Err(Error::VersionMismatch));
        assert_eq!(init(VERSION), Ok(()));
    }

    #[test]
    fn test_first_row_is_all_ones() {
        for k in [2usize, 5, 100, 200] {
            let x_0 = k as u8;
            for j in 0..k {
                assert_eq!(matrix_element(x_0, x_0, j as u8).0, 1);
            }
        }
    }

    #[test]
    fn test_single_original_copies() {
        // k=1: every recovery row is a copy of the one original.
        let params = Params::new(1, 3, 4).unwrap();
        let data = vec![0xde, 0xad, 0xbe, 0xef];
        let blocks = vec![Block::new(0, &data)];

        let mut recovery = vec![0u8; 12];
        encode(&params, &blocks, &mut recovery).unwrap();
        for r in 0..3 {
            assert_eq!(&recovery[r * 4..(r + 1) * 4], &data[..]);
        }

        // Any single block decodes to row 0.
        let mut rec = recovery[8..].to_vec();
        let mut have = vec![BlockMut::new(3, &mut rec)];
        let recovered = decode(&params, &mut have).unwrap();
        assert!(recovered.is_empty());
        assert_eq!(have[0].index, 0);
        assert_eq!(&have[0].data[..], &data[..]);
    }

    #[test]
    fn test_two_originals_one_parity() {
        let params = Params::new(2, 1, 4).unwrap();
        let o0 = vec![0x01, 0x02, 0x03, 0x04];
        let o1 = vec![0x05, 0x06, 0x07, 0x08];
        let blocks = vec![Block::new(0, &o0), Block::new(1, &o1)];

        let mut recovery = vec![0u8; 4];
        encode(&params, &blocks, &mut recovery).unwrap();
        assert_eq!(recovery, vec![0x04, 0x04, 0x04, 0x04]);

        // Lose block 0; recover it from block 1 and the parity.
        let mut b1 = o1.clone();
        let mut r0 = recovery.clone();
        let mut have = vec![BlockMut::new(1, &mut b1), BlockMut::new(2, &mut r0)];
        let recovered = decode(&params, &mut have).unwrap();
        assert_eq!(recovered, vec![0]);
        assert_eq!(have[1].index, 0);
        assert_eq!(&have[1].data[..], &o0[..]);
    }

    #[test]
    fn test_xor_parity_row() {
        let params = Params::new(3, 1, 4).unwrap();

        let o0 = vec![0x11, 0x22, 0x33, 0x44];
        let o1 = vec![0x55, 0x66, 0x77, 0x88];
        let o2 = vec![0x99, 0xaa, 0xbb, 0xcc];
        let blocks = vec![Block::new(0, &o0), Block::new(1, &o1), Block::new(2, &o2)];

        let mut recovery = vec![0u8; 4];
        encode(&params, &blocks, &mut recovery).unwrap();

        // First matrix row is all ones: the row is a plain parity.
        assert_eq!(recovery, vec![0xdd, 0xee, 0xff, 0x00]);
    }

    #[test]
    fn test_known_answer_3_2() {
        // Fixed vectors for (3 original, 2 recovery, 16 bytes); any change
        // here breaks wire compatibility with existing encoded data.
        let params = Params::new(3, 2, 16).unwrap();

        let o0 = vec![0x01u8; 16];
        let o1 = vec![0x02u8; 16];
        let o2 = vec![0x03u8; 16];
        let blocks = vec![Block::new(0, &o0), Block::new(1, &o1), Block::new(2, &o2)];

        let mut recovery = vec![0u8; 32];
        encode(&params, &blocks, &mut recovery).unwrap();

        assert_eq!(&recovery[..16], &vec![0x00u8; 16][..]);
        assert_eq!(&recovery[16..], &vec![0xd5u8; 16][..]);
    }

    #[test]
    fn test_known_answer_5_3() {
        // Fixed vectors for (5 original, 3 recovery, 32 bytes) with block
        // bytes (i * 32 + j) % 256.
        let params = Params::new(5, 3, 32).unwrap();

        let originals: Vec<Vec<u8>> = (0..5)
            .map(|i| (0..32).map(|j| ((i * 32 + j) % 256) as u8).collect())
            .collect();
        let recovery = encode_all(&params, &originals);

        let rec0: Vec<u8> = (0x80..=0x9f).collect();
        let rec1: Vec<u8> = vec![
            0xae, 0x03, 0xb9, 0x14, 0x80, 0x2d, 0x97, 0x3a, 0xf2, 0x5f, 0xe5, 0x48, 0xdc, 0x71,
            0xcb, 0x66, 0x16, 0xbb, 0x01, 0xac, 0x38, 0x95, 0x2f, 0x82, 0x4a, 0xe7, 0x5d, 0xf0,
            0x64, 0xc9, 0x73, 0xde,
        ];
        let rec2: Vec<u8> = vec![
            0x39, 0x34, 0x23, 0x2e, 0x0d, 0x00, 0x17, 0x1a, 0x51, 0x5c, 0x4b, 0x46, 0x65, 0x68,
            0x7f, 0x72, 0xe9, 0xe4, 0xf3, 0xfe, 0xdd, 0xd0, 0xc7, 0xca, 0x81, 0x8c, 0x9b, 0x96,
            0xb5, 0xb8, 0xaf, 0xa2,
        ];

        assert_eq!(&recovery[..32], &rec0[..]);
        assert_eq!(&recovery[32..64], &rec1[..]);
        assert_eq!(&recovery[64..], &rec2[..]);
    }

    #[test]
    fn test_zero_blocks_stay_zero() {
        // All-zero originals encode to all-zero recoveries and decode back.
        let params = Params::new(3, 2, 1).unwrap();
        let originals = vec![vec![0u8], vec![0u8], vec![0u8]];
        let recovery = encode_all(&params, &originals);
        assert_eq!(recovery, vec![0, 0]);

        for erased in [vec![0], vec![1], vec![2], vec![0, 2]] {
            assert_roundtrip(&params, &originals, &recovery, &erased);
        }
    }

    #[test]
    fn test_decode_without_erasures_is_noop() {
        let params = Params::new(4, 2, 32).unwrap();
        let originals = random_originals(4, 32);

        let mut copies = originals.clone();
        let mut blocks: Vec<BlockMut> = copies
            .iter_mut()
            .enumerate()
            .map(|(i, data)| BlockMut::new(i as u8, data))
            .collect();

        let recovered = decode(&params, &mut blocks).unwrap();
        assert!(recovered.is_empty());
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.index as usize, i);
            assert_eq!(&block.data[..], &originals[i][..]);
        }
    }

    #[test]
    fn test_m1_reconstruction() {
        // The single recovery row is a parity; reconstruction is pure XOR.
        let params = Params::new(4, 1, 64).unwrap();
        let originals = random_originals(4, 64);
        let recovery = encode_all(&params, &originals);

        for erased in 0..4 {
            assert_roundtrip(&params, &originals, &recovery, &[erased]);
        }
    }

    #[test]
    fn test_single_erasure_general_path() {
        // m > 1 forces the elimination path even for one missing block.
        let params = Params::new(5, 3, 40).unwrap();
        let originals = random_originals(5, 40);
        let recovery = encode_all(&params, &originals);

        assert_roundtrip(&params, &originals, &recovery, &[1]);
    }

    #[test]
    fn test_double_erasure() {
        let params = Params::new(4, 2, 24).unwrap();
        let originals = random_originals(4, 24);
        let recovery = encode_all(&params, &originals);

        assert_roundtrip(&params, &originals, &recovery, &[0, 2]);
    }

    #[test]
    fn test_all_originals_lost() {
        let params = Params::new(3, 3, 16).unwrap();
        let originals = random_originals(3, 16);
        let recovery = encode_all(&params, &originals);

        assert_roundtrip(&params, &originals, &recovery, &[0, 1, 2]);
    }

    #[test]
    fn test_odd_block_sizes() {
        // Sizes that leave SIMD and u64 tails of every length.
        for block_bytes in [1usize, 3, 7, 17, 65] {
            let params = Params::new(5, 3, block_bytes).unwrap();
            let originals = random_originals(5, block_bytes);
            let recovery = encode_all(&params, &originals);
            assert_roundtrip(&params, &originals, &recovery, &[0, 3]);
        }
    }

    #[test]
    fn test_roundtrip_sweep() {
        let mut rng = rand::thread_rng();
        for (k, m) in [(2usize, 2usize), (3, 5), (7, 4), (16, 16)] {
            let params = Params::new(k, m, 48).unwrap();
            let originals = random_originals(k, 48);
            let recovery = encode_all(&params, &originals);

            for erase_count in 0..=m.min(k) {
                // A random ascending erasure pattern of the given size.
                let mut erased: Vec<usize> = (0..k).collect();
                for i in (1..erased.len()).rev() {
                    let j = rng.gen_range(0..=i);
                    erased.swap(i, j);
                }
                erased.truncate(erase_count);
                erased.sort_unstable();

                assert_roundtrip(&params, &originals, &recovery, &erased);
            }
        }
    }

    #[test]
    fn test_large_code_roundtrip() {
        // 200 + 56 at 1 KiB: the recovery matrix spills to the heap.
        let params = Params::new(200, 56, 1024).unwrap();
        let originals = random_originals(200, 1024);
        let recovery = encode_all(&params, &originals);

        let mut rng = rand::thread_rng();
        let mut erased: Vec<usize> = (0..200).collect();
        for i in (1..erased.len()).rev() {
            let j = rng.gen_range(0..=i);
            erased.swap(i, j);
        }
        erased.truncate(56);
        erased.sort_unstable();

        assert_roundtrip(&params, &originals, &recovery, &erased);
    }

    #[test]
    fn test_encode_rejects_bad_shapes() {
        let params = Params::new(3, 2, 16).unwrap();
        let data = vec![0u8; 16];
        let blocks = vec![Block::new(0, &data), Block::new(1, &data)];

        let mut recovery = vec![0u8; 32];
        assert_eq!(
            encode(&params, &blocks, &mut recovery),
            Err(Error::InvalidInput)
        );

        let blocks = vec![
            Block::new(0, &data),
            Block::new(1, &data),
            Block::new(2, &data),
        ];
        let mut short = vec![0u8; 31];
        assert_eq!(
            encode(&params, &blocks, &mut short),
            Err(Error::InvalidInput)
        );
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let params = Params::new(3, 2, 4).unwrap();

        let mut a = vec![0u8; 4];
        let mut b = vec![0u8; 4];
        let mut have = vec![BlockMut::new(0, &mut a), BlockMut::new(1, &mut b)];
        assert_eq!(decode(&params, &mut have), Err(Error::InsufficientBlocks));

        let mut a = vec![0u8; 4];
        let mut b = vec![0u8; 4];
        let mut c = vec![0u8; 4];
        let mut have = vec![
            BlockMut::new(0, &mut a),
            BlockMut::new(0, &mut b),
            BlockMut::new(2, &mut c),
        ];
        assert_eq!(decode(&params, &mut have), Err(Error::DuplicateIndex));
    }
}

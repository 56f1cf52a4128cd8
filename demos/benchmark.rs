//! Encode/decode throughput benchmark.
//!
//! 100 original + 30 recovery blocks of 1296 bytes (a video-streaming kind
//! of shape), decoding the worst case where the first 30 originals are all
//! lost.

use std::time::Instant;

use cauchy256::{decode, encode, Block, BlockMut, Params};

fn main() {
    let block_bytes = 1296usize;
    let original_count = 100usize;
    let recovery_count = 30usize;
    let trials = 1000u32;

    let params = Params::new(original_count, recovery_count, block_bytes).unwrap();
    let data_size = original_count * block_bytes;

    let orig_data: Vec<Vec<u8>> = (0..original_count)
        .map(|i| {
            (0..block_bytes)
                .map(|j| ((i * block_bytes + j) % 256) as u8)
                .collect()
        })
        .collect();

    let mut recovery_data = vec![0u8; recovery_count * block_bytes];

    let encode_start = Instant::now();
    for _ in 0..trials {
        let blocks: Vec<Block> = orig_data
            .iter()
            .enumerate()
            .map(|(i, data)| Block::new(i as u8, data))
            .collect();
        encode(&params, &blocks, &mut recovery_data).unwrap();
    }
    let encode_us = encode_start.elapsed().as_micros() as f64 / trials as f64;

    let decode_start = Instant::now();
    for _ in 0..trials {
        // Fresh copies each trial: the decoder rewrites its input.
        let mut buffers: Vec<(u8, Vec<u8>)> = (0..recovery_count)
            .map(|r| {
                let data = recovery_data[r * block_bytes..(r + 1) * block_bytes].to_vec();
                ((original_count + r) as u8, data)
            })
            .collect();
        for i in recovery_count..original_count {
            buffers.push((i as u8, orig_data[i].clone()));
        }
        let mut blocks: Vec<BlockMut> = buffers
            .iter_mut()
            .map(|(index, data)| BlockMut::new(*index, data))
            .collect();
        decode(&params, &mut blocks).unwrap();
    }
    let decode_us = decode_start.elapsed().as_micros() as f64 / trials as f64;

    println!("cauchy256: {original_count}+{recovery_count} blocks of {block_bytes} bytes");
    println!(
        "  encode: {encode_us:8.1} us/call  {:8.1} MB/s",
        data_size as f64 / encode_us
    );
    println!(
        "  decode: {decode_us:8.1} us/call  {:8.1} MB/s",
        data_size as f64 / decode_us
    );
}

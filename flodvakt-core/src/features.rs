//! Fixed-schema feature extraction.
//!
//! `extract_features` is a pure function from a `FlowRecord` to a
//! `FeatureVector`: deterministic, no wall-clock access, no randomness.
//! The schema follows the CICIDS-style naming the rule engine was tuned
//! against. Several entries are documented approximations rather than
//! measurements:
//!
//! - forward/backward packet and byte totals are exact halves of the flow
//!   totals; detection thresholds were tuned against this split and must
//!   be recalibrated if true directional accounting is ever introduced
//! - TCP "flag" features are fixed heuristics keyed off the protocol tag,
//!   not real flag inspection
//! - packet-length min/max assume a 64-byte minimum Ethernet frame and a
//!   1500-byte MTU

use serde::{Deserialize, Serialize};

use crate::flow::FlowRecord;

const MIN_FRAME_BYTES: f64 = 64.0;
const MTU_BYTES: f64 = 1500.0;
const TCP_HEADER_BYTES: f64 = 20.0;

/// Named numeric features derived from one flow. Never mutated after
/// creation; persisted as-is by the feature sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub destination_port: f64,
    pub flow_duration: f64,
    pub total_fwd_packets: f64,
    pub total_bwd_packets: f64,
    pub total_length_fwd_packets: f64,
    pub total_length_bwd_packets: f64,
    pub fwd_packet_length_max: f64,
    pub fwd_packet_length_min: f64,
    pub fwd_packet_length_mean: f64,
    pub fwd_packet_length_std: f64,
    pub bwd_packet_length_max: f64,
    pub bwd_packet_length_min: f64,
    pub bwd_packet_length_mean: f64,
    pub bwd_packet_length_std: f64,
    pub flow_bytes_per_sec: f64,
    pub flow_packets_per_sec: f64,
    pub flow_iat_mean: f64,
    pub flow_iat_std: f64,
    pub flow_iat_max: f64,
    pub flow_iat_min: f64,
    pub fwd_iat_total: f64,
    pub fwd_iat_mean: f64,
    pub fwd_iat_std: f64,
    pub fwd_iat_max: f64,
    pub fwd_iat_min: f64,
    pub bwd_iat_total: f64,
    pub bwd_iat_mean: f64,
    pub bwd_iat_std: f64,
    pub bwd_iat_max: f64,
    pub bwd_iat_min: f64,
    pub fwd_psh_flags: f64,
    pub bwd_psh_flags: f64,
    pub fwd_urg_flags: f64,
    pub bwd_urg_flags: f64,
    pub fwd_header_length: f64,
    pub bwd_header_length: f64,
    pub fwd_packets_per_sec: f64,
    pub bwd_packets_per_sec: f64,
    pub min_packet_length: f64,
    pub max_packet_length: f64,
    pub packet_length_mean: f64,
    pub packet_length_std: f64,
    pub packet_length_variance: f64,
    pub fin_flag_count: f64,
    pub syn_flag_count: f64,
    pub rst_flag_count: f64,
    pub psh_flag_count: f64,
    pub ack_flag_count: f64,
    pub urg_flag_count: f64,
    pub cwe_flag_count: f64,
    pub ece_flag_count: f64,
    pub down_up_ratio: f64,
    pub average_packet_size: f64,
    pub avg_fwd_segment_size: f64,
    pub avg_bwd_segment_size: f64,
    pub total_packets: f64,
    pub total_bytes: f64,
    pub bytes_per_second: f64,
    pub packets_per_second: f64,
    pub bytes_per_packet: f64,
}

/// Derives the feature vector for one flow.
pub fn extract_features(flow: &FlowRecord) -> FeatureVector {
    let packets = flow.packet_count as f64;
    let bytes = flow.byte_count as f64;
    let duration_ms = flow.flow_duration_ms as f64;
    let duration_secs = duration_ms / 1000.0;
    let tcp = flow.protocol.is_tcp();

    let bytes_per_packet = bytes / (flow.packet_count.max(1) as f64);
    let packets_per_second = if flow.flow_duration_ms > 0 {
        packets / duration_secs
    } else {
        0.0
    };
    let bytes_per_second = if flow.flow_duration_ms > 0 {
        bytes / duration_secs
    } else {
        0.0
    };
    // Mean inter-arrival time over packet gaps; a single-packet flow has no
    // gaps, so the whole duration stands in.
    let iat_mean = if flow.packet_count > 1 {
        duration_ms / (packets - 1.0)
    } else {
        duration_ms
    };

    let half_packets = (flow.packet_count / 2) as f64;
    let half_bytes = (flow.byte_count / 2) as f64;

    FeatureVector {
        destination_port: f64::from(flow.dest_port),
        flow_duration: duration_ms,
        total_fwd_packets: half_packets,
        total_bwd_packets: half_packets,
        total_length_fwd_packets: half_bytes,
        total_length_bwd_packets: half_bytes,
        fwd_packet_length_max: MTU_BYTES,
        fwd_packet_length_min: MIN_FRAME_BYTES,
        fwd_packet_length_mean: bytes_per_packet / 2.0,
        fwd_packet_length_std: 200.0,
        bwd_packet_length_max: MTU_BYTES,
        bwd_packet_length_min: MIN_FRAME_BYTES,
        bwd_packet_length_mean: bytes_per_packet / 2.0,
        bwd_packet_length_std: 200.0,
        flow_bytes_per_sec: bytes_per_second,
        flow_packets_per_sec: packets_per_second,
        flow_iat_mean: iat_mean,
        flow_iat_std: 100.0,
        flow_iat_max: duration_ms,
        flow_iat_min: 1.0,
        fwd_iat_total: duration_ms / 2.0,
        fwd_iat_mean: iat_mean,
        fwd_iat_std: 50.0,
        fwd_iat_max: duration_ms / 2.0,
        fwd_iat_min: 1.0,
        bwd_iat_total: duration_ms / 2.0,
        bwd_iat_mean: iat_mean,
        bwd_iat_std: 50.0,
        bwd_iat_max: duration_ms / 2.0,
        bwd_iat_min: 1.0,
        fwd_psh_flags: if tcp { 1.0 } else { 0.0 },
        bwd_psh_flags: if tcp { 1.0 } else { 0.0 },
        fwd_urg_flags: 0.0,
        bwd_urg_flags: 0.0,
        fwd_header_length: if tcp {
            TCP_HEADER_BYTES * (packets / 2.0)
        } else {
            0.0
        },
        bwd_header_length: if tcp {
            TCP_HEADER_BYTES * (packets / 2.0)
        } else {
            0.0
        },
        fwd_packets_per_sec: packets_per_second / 2.0,
        bwd_packets_per_sec: packets_per_second / 2.0,
        min_packet_length: MIN_FRAME_BYTES,
        max_packet_length: MTU_BYTES,
        packet_length_mean: bytes_per_packet,
        packet_length_std: 300.0,
        packet_length_variance: 90_000.0,
        fin_flag_count: if tcp { 1.0 } else { 0.0 },
        syn_flag_count: if tcp { 1.0 } else { 0.0 },
        rst_flag_count: 0.0,
        psh_flag_count: if tcp { 2.0 } else { 0.0 },
        ack_flag_count: if tcp { packets - 2.0 } else { 0.0 },
        urg_flag_count: 0.0,
        cwe_flag_count: 0.0,
        ece_flag_count: 0.0,
        down_up_ratio: 1.0,
        average_packet_size: bytes_per_packet,
        avg_fwd_segment_size: bytes_per_packet / 2.0,
        avg_bwd_segment_size: bytes_per_packet / 2.0,
        total_packets: packets,
        total_bytes: bytes,
        bytes_per_second,
        packets_per_second,
        bytes_per_packet,
    }
}

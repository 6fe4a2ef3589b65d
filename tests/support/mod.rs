//! Minimal FIT writer for building synthetic telemetry containers in tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, TimeZone as _, Utc};

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z).
const FIT_EPOCH_OFFSET: i64 = 631_065_600;

const GLOBAL_MSG_RECORD: u16 = 20;

const BASE_UINT8: u8 = 0x02;
const BASE_UINT16: u8 = 0x84;
const BASE_UINT32: u8 = 0x86;

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

/// One `record` message. `None` fields are written as the FIT invalid value.
#[derive(Clone, Copy, Debug)]
pub struct FitRecord {
    pub at: DateTime<Utc>,
    pub speed_mps: Option<f64>,
    pub power: Option<u16>,
    pub heart_rate: Option<u8>,
    pub cadence: Option<u8>,
}

impl FitRecord {
    pub fn at(at: DateTime<Utc>) -> Self {
        Self {
            at,
            speed_mps: None,
            power: None,
            heart_rate: None,
            cadence: None,
        }
    }

    pub fn speed_kmh(mut self, kmh: f64) -> Self {
        self.speed_mps = Some(kmh / 3.6);
        self
    }

    pub fn power(mut self, watts: u16) -> Self {
        self.power = Some(watts);
        self
    }

    pub fn heart_rate(mut self, bpm: u8) -> Self {
        self.heart_rate = Some(bpm);
        self
    }

    pub fn cadence(mut self, rpm: u8) -> Self {
        self.cadence = Some(rpm);
        self
    }
}

/// 2025-12-09 11:29:45 UTC, the start of every synthetic ride.
pub fn ride_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 9, 11, 29, 45).unwrap()
}

/// One record per second for `secs + 1` seconds, all four channels ramping linearly.
pub fn steady_ride(start: DateTime<Utc>, secs: i64) -> Vec<FitRecord> {
    (0..=secs)
        .map(|i| {
            FitRecord::at(start + TimeDelta::seconds(i))
                .speed_kmh(10.0 + i as f64)
                .power(150 + i as u16)
                .heart_rate(120 + (i % 50) as u8)
                .cadence(85)
        })
        .collect()
}

/// Encode `records` as a complete FIT file: header, one definition, data messages, CRC.
pub fn fit_bytes(records: &[FitRecord]) -> Vec<u8> {
    let mut data = Vec::new();

    // Definition message, local type 0.
    data.push(0x40);
    data.push(0); // reserved
    data.push(0); // little-endian
    data.extend_from_slice(&GLOBAL_MSG_RECORD.to_le_bytes());
    let fields: [(u8, u8, u8); 5] = [
        (253, 4, BASE_UINT32), // timestamp
        (6, 2, BASE_UINT16),   // speed, m/s * 1000
        (7, 2, BASE_UINT16),   // power
        (3, 1, BASE_UINT8),    // heart_rate
        (4, 1, BASE_UINT8),    // cadence
    ];
    data.push(fields.len() as u8);
    for (num, size, base) in fields {
        data.extend_from_slice(&[num, size, base]);
    }

    for r in records {
        data.push(0x00);
        let ts = (r.at.timestamp() - FIT_EPOCH_OFFSET) as u32;
        data.extend_from_slice(&ts.to_le_bytes());
        let speed = r
            .speed_mps
            .map_or(u16::MAX, |v| (v * 1000.0).round() as u16);
        data.extend_from_slice(&speed.to_le_bytes());
        data.extend_from_slice(&r.power.unwrap_or(u16::MAX).to_le_bytes());
        data.push(r.heart_rate.unwrap_or(u8::MAX));
        data.push(r.cadence.unwrap_or(u8::MAX));
    }

    let mut out = Vec::with_capacity(14 + data.len() + 2);
    out.push(14);
    out.push(0x20); // protocol 2.0
    out.extend_from_slice(&2132u16.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(b".FIT");
    let header_crc = crc(&out);
    out.extend_from_slice(&header_crc.to_le_bytes());

    out.extend_from_slice(&data);
    let file_crc = crc(&out);
    out.extend_from_slice(&file_crc.to_le_bytes());
    out
}

pub fn write_fit(path: &Path, records: &[FitRecord]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, fit_bytes(records)).unwrap();
}

/// Fresh directory under `target/` for one test.
pub fn scratch_dir(group: &str, name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join(group).join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn crc(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |mut crc, &byte| {
        let tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[(byte & 0xF) as usize];

        let tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize]
    })
}

// CLASSIFICATION: COMMUNITY
// Filename: device.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Device identifier <-> device directory name codec.
//!
//! `/job:ps/replica:1/task:2/cpu:0` is stored on disk as
//! `_tfdbg_device_,job_ps,replica_1,task_2,cpu_0`.

use std::fmt;
use std::str::FromStr;

use super::{DEVICE_TAG, METADATA_FILE_PREFIX};
use crate::error::FormatError;

const DEVICE_PATH_PATTERN: &str =
    "_tfdbg_device_,job_<job>,replica_<n>,task_<n>,<device-kind>_<n>";
const DEVICE_NAME_PATTERN: &str = "/job:<job>/replica:<n>/task:<n>/<device-kind>:<n>";

/// A parsed `/job:J/replica:R/task:T/<kind>:I` device identifier.
///
/// Numeric fields are kept as written so that formatting reproduces the
/// parsed text exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceName {
    job: String,
    replica: String,
    task: String,
    kind: String,
    index: String,
}

impl DeviceName {
    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn replica(&self) -> &str {
        &self.replica
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Parse a device directory name. Only the final path component of
    /// `device_dir` is considered, so both a bare directory name and a full
    /// path are accepted.
    pub fn from_dir_name(device_dir: &str) -> Result<Self, FormatError> {
        let base = device_dir
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        let malformed = || FormatError::DevicePath {
            name: device_dir.to_string(),
            expected: DEVICE_PATH_PATTERN,
        };

        let encoded = base
            .strip_prefix(METADATA_FILE_PREFIX)
            .and_then(|rest| rest.strip_prefix(DEVICE_TAG))
            .and_then(|rest| rest.strip_prefix(','))
            .ok_or_else(malformed)?;

        let fields: Vec<&str> = encoded.split(',').collect();
        let [job, replica, task, device] = fields.as_slice() else {
            return Err(malformed());
        };
        Self::from_fields(
            job.strip_prefix("job_"),
            replica.strip_prefix("replica_"),
            task.strip_prefix("task_"),
            device.rsplit_once('_'),
        )
        .ok_or_else(malformed)
    }

    /// Directory name this device is dumped under.
    pub fn dir_name(&self) -> String {
        encode_device(&self.to_string())
    }

    fn from_fields(
        job: Option<&str>,
        replica: Option<&str>,
        task: Option<&str>,
        device: Option<(&str, &str)>,
    ) -> Option<Self> {
        let job = job.filter(|v| is_name(v))?;
        let replica = replica.filter(|v| is_decimal(v))?;
        let task = task.filter(|v| is_decimal(v))?;
        let (kind, index) = device.filter(|(k, i)| is_name(k) && is_decimal(i))?;
        Some(Self {
            job: job.into(),
            replica: replica.into(),
            task: task.into(),
            kind: kind.into(),
            index: index.into(),
        })
    }
}

impl FromStr for DeviceName {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || FormatError::DevicePath {
            name: s.to_string(),
            expected: DEVICE_NAME_PATTERN,
        };
        let fields: Vec<&str> = s.strip_prefix('/').ok_or_else(malformed)?.split('/').collect();
        let [job, replica, task, device] = fields.as_slice() else {
            return Err(malformed());
        };
        Self::from_fields(
            job.strip_prefix("job:"),
            replica.strip_prefix("replica:"),
            task.strip_prefix("task:"),
            device.rsplit_once(':'),
        )
        .ok_or_else(malformed)
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/job:{}/replica:{}/task:{}/{}:{}",
            self.job, self.replica, self.task, self.kind, self.index
        )
    }
}

/// Encode a device identifier as a path-safe directory name.
///
/// Any string is mapped, but only identifiers that parse as a [`DeviceName`]
/// decode back to themselves; `/job:a/replica:0/task:0/device:GPU:0` does not.
pub fn encode_device(device_name: &str) -> String {
    let mut out = String::with_capacity(
        METADATA_FILE_PREFIX.len() + DEVICE_TAG.len() + device_name.len(),
    );
    out.push_str(METADATA_FILE_PREFIX);
    out.push_str(DEVICE_TAG);
    out.extend(device_name.chars().map(|c| match c {
        '/' => ',',
        ':' => '_',
        other => other,
    }));
    out
}

/// Decode a device directory name back into the device identifier.
pub fn decode_device(device_dir: &str) -> Result<String, FormatError> {
    DeviceName::from_dir_name(device_dir).map(|device| device.to_string())
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && !s.contains(['/', ':', ','])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_device_name() {
        assert_eq!(
            encode_device("/job:ps/replica:1/task:2/cpu:0"),
            "_tfdbg_device_,job_ps,replica_1,task_2,cpu_0"
        );
    }

    #[test]
    fn decodes_device_dir() {
        assert_eq!(
            decode_device("_tfdbg_device_,job_ps,replica_1,task_2,cpu_0").unwrap(),
            "/job:ps/replica:1/task:2/cpu:0"
        );
        assert_eq!(
            decode_device("/tmp/dump/_tfdbg_device_,job_localhost,replica_0,task_0,gpu_1/")
                .unwrap(),
            "/job:localhost/replica:0/task:0/gpu:1"
        );
    }

    #[test]
    fn round_trips_underscored_names() {
        for name in [
            "/job:localhost/replica:0/task:0/cpu:0",
            "/job:my_worker/replica:12/task:3/gpu:7",
            "/job:w/replica:0/task:0/XLA_CPU:0",
        ] {
            assert_eq!(decode_device(&encode_device(name)).unwrap(), name);
        }
    }

    #[test]
    fn typed_device_name() {
        let device: DeviceName = "/job:my_worker/replica:01/task:3/XLA_GPU:7".parse().unwrap();
        assert_eq!(device.job(), "my_worker");
        assert_eq!(device.replica(), "01");
        assert_eq!(device.task(), "3");
        assert_eq!(device.kind(), "XLA_GPU");
        assert_eq!(device.index(), "7");
        assert_eq!(device.to_string(), "/job:my_worker/replica:01/task:3/XLA_GPU:7");
        assert_eq!(device.dir_name(), "_tfdbg_device_,job_my_worker,replica_01,task_3,XLA_GPU_7");
        assert_eq!(DeviceName::from_dir_name(&device.dir_name()).unwrap(), device);
    }

    #[test]
    fn identifiers_outside_the_grammar_do_not_round_trip() {
        let name = "/job:a/replica:0/task:0/device:GPU:0";
        assert!(name.parse::<DeviceName>().is_err());
        assert_ne!(decode_device(&encode_device(name)).unwrap(), name);

        for bad in ["job:a/replica:0/task:0/cpu:0", "/job:a/replica:0/cpu:0", "/job:a/replica:x/task:0/cpu:0"] {
            let err = bad.parse::<DeviceName>().unwrap_err();
            assert!(matches!(err, FormatError::DevicePath { .. }), "{bad}");
        }
    }

    #[test]
    fn rejects_malformed_dirs() {
        for bad in [
            "job_ps,replica_1,task_2,cpu_0",
            "_tfdbg_,job_ps,replica_1,task_2,cpu_0",
            "_tfdbg_device_job_ps,replica_1,task_2,cpu_0",
            "_tfdbg_device_,job_ps,replica_1,task_2",
            "_tfdbg_device_,job_ps,replica_1,task_2,cpu_0,extra_1",
            "_tfdbg_device_,job_ps,replica_x,task_2,cpu_0",
            "_tfdbg_device_,job_ps,replica_1,task_2,cpu",
            "_tfdbg_device_,job_,replica_1,task_2,cpu_0",
            "_tfdbg_graph_1234",
        ] {
            let err = decode_device(bad).unwrap_err();
            assert!(matches!(err, FormatError::DevicePath { .. }), "{bad}");
        }
    }
}

use serde::{Deserialize, Serialize};

/// Data-word counters for one io channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCountsPerStatus {
    pub total: u64,
    pub valid_parity: u64,
    pub invalid_parity: u64,
    pub downstream: u64,
    pub upstream: u64,
}

impl DataCountsPerStatus {
    pub(crate) fn add(&mut self, valid: bool, downstream: bool) {
        self.total += 1;
        if valid {
            self.valid_parity += 1;
        } else {
            self.invalid_parity += 1;
        }
        if downstream {
            self.downstream += 1;
        } else {
            self.upstream += 1;
        }
    }
}

/// Kind of configuration access carried by a reclassified Data word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigAccess {
    Read,
    Write,
}

/// Configuration read/write counters for one io channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCountsPerStatus {
    pub total: u64,
    pub invalid_parity: u64,
    pub ds_read: u64,
    pub ds_write: u64,
    pub us_read: u64,
    pub us_write: u64,
}

impl ConfigCountsPerStatus {
    pub(crate) fn add(&mut self, access: ConfigAccess, valid: bool, downstream: bool) {
        self.total += 1;
        if !valid {
            self.invalid_parity += 1;
        }
        let slot = match (downstream, access) {
            (true, ConfigAccess::Read) => &mut self.ds_read,
            (true, ConfigAccess::Write) => &mut self.ds_write,
            (false, ConfigAccess::Read) => &mut self.us_read,
            (false, ConfigAccess::Write) => &mut self.us_write,
        };
        *slot += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigAccess, ConfigCountsPerStatus, DataCountsPerStatus};

    #[test]
    fn data_counts_split_by_parity_and_direction() {
        let mut counts = DataCountsPerStatus::default();
        counts.add(true, true);
        counts.add(false, false);
        counts.add(true, false);
        assert_eq!(
            counts,
            DataCountsPerStatus {
                total: 3,
                valid_parity: 2,
                invalid_parity: 1,
                downstream: 1,
                upstream: 2,
            }
        );
    }

    #[test]
    fn config_counts_increment_exactly_one_direction_slot() {
        let mut counts = ConfigCountsPerStatus::default();
        counts.add(ConfigAccess::Read, true, true);
        counts.add(ConfigAccess::Write, false, true);
        counts.add(ConfigAccess::Read, true, false);
        counts.add(ConfigAccess::Write, true, false);
        counts.add(ConfigAccess::Write, false, false);
        assert_eq!(
            counts,
            ConfigCountsPerStatus {
                total: 5,
                invalid_parity: 2,
                ds_read: 1,
                ds_write: 1,
                us_read: 1,
                us_write: 2,
            }
        );
    }
}

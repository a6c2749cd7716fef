use std::path::PathBuf;

use clap::Parser;

/// Dashboard of Indonesian higher-education institutions per province.
#[derive(Debug, Clone, Parser)]
#[command(name = "pt-dashboard", version, about)]
pub struct Config {
    /// Institution table to load at startup.
    #[arg(
        long,
        env = "PT_DASHBOARD_DATA",
        default_value = "perguruanTinggiIndonesia.csv"
    )]
    pub data: PathBuf,

    /// Initial window width in points.
    #[arg(long, default_value_t = 1400.0)]
    pub width: f32,

    /// Initial window height in points.
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["pt-dashboard"]).unwrap();
        assert_eq!(config.width, 1400.0);
        assert_eq!(config.height, 900.0);
    }

    #[test]
    fn data_path_from_flag() {
        let config = Config::try_parse_from(["pt-dashboard", "--data", "/tmp/pt.csv"]).unwrap();
        assert_eq!(config.data, PathBuf::from("/tmp/pt.csv"));
    }
}

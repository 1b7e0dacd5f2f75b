use std::fs;
use std::path::Path;

use iio_aio::aio::close;
use iio_aio::{AioConfig, AioError, AnalogInput, MapError, StaticPinMap};

fn write_raw(dir: &Path, channel: u32, value: &str) {
    fs::write(dir.join(format!("in_voltage{}_raw", channel)), value).unwrap();
}

fn galileo_profile(dir: &Path) -> AioConfig {
    AioConfig {
        device_dir: dir.to_path_buf(),
        max_path_len: 4096,
        ..AioConfig::default()
    }
}

#[test]
fn every_mapped_channel_opens_reads_and_closes() {
    let dir = tempfile::tempdir().unwrap();
    let map = StaticPinMap::identity(6);
    for channel in 0..6 {
        write_raw(dir.path(), channel, &format!("{}\n", channel * 800));
    }

    for channel in 0..6 {
        let mut input = AnalogInput::init(channel, &map, galileo_profile(dir.path())).unwrap();
        // 12-bit samples come back as 10-bit values
        assert_eq!(input.read().unwrap(), ((channel * 800) >> 2) as u16);
        input.close().unwrap();
    }
}

#[test]
fn construction_never_yields_a_partial_input() {
    let dir = tempfile::tempdir().unwrap();
    write_raw(dir.path(), 0, "1\n");
    let map = StaticPinMap::identity(2);

    let missing = AnalogInput::init(1, &map, galileo_profile(dir.path()));
    assert!(matches!(missing, Err(AioError::InvalidResource { .. })));

    let invalid = AnalogInput::init(9, &map, galileo_profile(dir.path()));
    assert!(matches!(
        invalid,
        Err(AioError::Map(MapError::InvalidChannel(9)))
    ));

    assert!(close(missing.ok()).is_ok());
}

#[test]
fn default_profile_points_at_iio_device_zero() {
    let config = AioConfig::default();
    let input_path = iio_aio::utils::raw_value_path(&config.device_dir, 0, config.max_path_len)
        .unwrap();
    assert_eq!(
        input_path,
        Path::new("/sys/bus/iio/devices/iio:device0/in_voltage0_raw")
    );
}

#[test]
fn independent_profiles_coexist() {
    let dir = tempfile::tempdir().unwrap();
    write_raw(dir.path(), 0, "1023\n");
    let map = StaticPinMap::identity(1);

    let narrow = AioConfig {
        raw_resolution_bits: 10,
        supported_resolution_bits: 8,
        ..galileo_profile(dir.path())
    };
    let wide = AioConfig {
        raw_resolution_bits: 10,
        supported_resolution_bits: 16,
        ..galileo_profile(dir.path())
    };

    let mut a = AnalogInput::init(0, &map, narrow).unwrap();
    let mut b = AnalogInput::init(0, &map, wide).unwrap();
    assert_eq!(a.read().unwrap(), 255);
    assert_eq!(b.read().unwrap(), 0xFFC0);
}

//! Unit tests for command line parsing

use crate::cli::{Cli, Mode};
use clap::Parser;
use gpumix_engine::gpumix::render::DeviceType;
use std::path::PathBuf;

#[test]
fn test_offscreen_defaults() {
    let cli = Cli::try_parse_from(["gpumix", "offscreen"]).unwrap();
    match cli.mode {
        Mode::Offscreen { common, out_dir } => {
            assert_eq!(out_dir, PathBuf::from("."));
            assert!(common.texture.is_none());
            assert!(common.log_file.is_none());
            assert!(!common.validation);
            assert_eq!(common.vertex_shader, PathBuf::from("gpumix_demo/shaders/quad.vert.spv"));
        }
        other => panic!("unexpected mode: {:?}", other),
    }
}

#[test]
fn test_log_file_without_value_uses_default_name() {
    let cli = Cli::try_parse_from(["gpumix", "onscreen", "--log-file"]).unwrap();
    match cli.mode {
        Mode::Onscreen { common } => assert_eq!(common.log_file, Some(PathBuf::from("gpumix.log"))),
        other => panic!("unexpected mode: {:?}", other),
    }
}

#[test]
fn test_log_file_with_value() {
    let cli = Cli::try_parse_from(["gpumix", "onscreen", "--log-file", "run.log"]).unwrap();
    match cli.mode {
        Mode::Onscreen { common } => assert_eq!(common.log_file, Some(PathBuf::from("run.log"))),
        other => panic!("unexpected mode: {:?}", other),
    }
}

#[test]
fn test_config_from_flags() {
    let cli = Cli::try_parse_from(["gpumix", "offscreen", "--validation", "--prefer-discrete"]).unwrap();
    let Mode::Offscreen { common, .. } = cli.mode else {
        panic!("expected offscreen mode");
    };
    let config = common.config();
    assert!(config.enable_validation);
    assert_eq!(config.preferred_device_type, DeviceType::DiscreteGpu);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["gpumix"]).is_err());
}

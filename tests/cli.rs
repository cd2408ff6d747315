// tests/cli.rs

mod common;

use assert_cmd::prelude::*;
use common::{asset_cache_cmd, create_file, scene};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const SAMPLE: &str = r#"    <texture type="2d" name="wood" file="textures/wood.png"/>
    <mesh name="hand" file="models/robot/hand.stl"/>"#;

#[test]
fn caches_assets_next_to_the_rewritten_scene() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "assets/textures/wood.png", "wood")?;
    create_file(temp.path(), "assets/models/robot/hand.stl", "hand")?;
    let xml = create_file(temp.path(), "scene.xml", &scene(SAMPLE))?;

    asset_cache_cmd()
        .arg(&xml)
        .arg("--cache-dir")
        .arg(temp.path().join("cache"))
        .arg("--asset-dir")
        .arg(temp.path().join("assets"))
        .assert()
        .success();

    let output = temp.path().join("cache/scene");
    assert_eq!(fs::read_to_string(output.join("textures_wood.png"))?, "wood");
    assert_eq!(fs::read_to_string(output.join("robot_hand.stl"))?, "hand");
    let rewritten = fs::read_to_string(output.join("transformed_scene.xml"))?;
    assert!(rewritten.contains(r#"file="textures_wood.png""#));
    assert!(rewritten.contains(r#"file="robot_hand.stl""#));

    temp.close()?;
    Ok(())
}

#[test]
fn max_depth_preserves_leading_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "models/robot/hand.stl", "hand")?;
    let xml = create_file(
        temp.path(),
        "scene.xml",
        &scene(r#"    <mesh name="hand" file="models/robot/hand.stl"/>"#),
    )?;

    asset_cache_cmd()
        .arg(&xml)
        .arg("--cache-dir")
        .arg(temp.path().join("cache"))
        .arg("--max-depth")
        .arg("1")
        .assert()
        .success();

    let output = temp.path().join("cache/scene");
    assert!(output.join("models/robot_hand.stl").is_file());

    temp.close()?;
    Ok(())
}

#[test]
fn malformed_xml_fails_without_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let xml = create_file(temp.path(), "broken.xml", "<mujoco><asset></mujoco>")?;

    asset_cache_cmd()
        .arg(&xml)
        .arg("--cache-dir")
        .arg(temp.path().join("cache"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("XML parse error"));

    assert!(!temp.path().join("cache/broken").exists());

    temp.close()?;
    Ok(())
}

#[test]
fn missing_assets_fail_unless_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "textures/wood.png", "wood")?;
    let xml = create_file(
        temp.path(),
        "scene.xml",
        &scene(
            r#"    <texture name="wood" file="textures/wood.png"/>
    <texture name="gone" file="textures/nonexistent.png"/>"#,
        ),
    )?;

    asset_cache_cmd()
        .arg(&xml)
        .arg("--cache-dir")
        .arg(temp.path().join("cache"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("textures/nonexistent.png"));

    asset_cache_cmd()
        .arg(&xml)
        .arg("--cache-dir")
        .arg(temp.path().join("cache"))
        .arg("--skip-missing")
        .assert()
        .success();

    let output = temp.path().join("cache/scene");
    let rewritten = fs::read_to_string(output.join("transformed_scene.xml"))?;
    assert!(rewritten.contains(r#"file="textures_wood.png""#));
    assert!(rewritten.contains(r#"file="textures/nonexistent.png""#));
    assert!(!output.join("textures_nonexistent.png").exists());

    temp.close()?;
    Ok(())
}

#[test]
fn strict_collisions_fail() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "left/hand/tip.stl", "left")?;
    create_file(temp.path(), "right/hand/tip.stl", "right")?;
    let xml = create_file(
        temp.path(),
        "scene.xml",
        &scene(
            r#"    <mesh name="left" file="left/hand/tip.stl"/>
    <mesh name="right" file="right/hand/tip.stl"/>"#,
        ),
    )?;

    asset_cache_cmd()
        .arg(&xml)
        .arg("--cache-dir")
        .arg(temp.path().join("cache"))
        .arg("--strict-collisions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("both flatten to 'hand_tip.stl'"));

    asset_cache_cmd()
        .arg(&xml)
        .arg("--cache-dir")
        .arg(temp.path().join("cache"))
        .assert()
        .success();

    temp.close()?;
    Ok(())
}

#[test]
fn missing_scene_file_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    asset_cache_cmd()
        .arg(temp.path().join("absent.xml"))
        .arg("--cache-dir")
        .arg(temp.path().join("cache"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.xml"));

    temp.close()?;
    Ok(())
}

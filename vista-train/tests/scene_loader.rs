mod common;

use common::{HEIGHT, WIDTH, colmap_scene, numbered};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fs;
use vista_data::read_colmap_scene_info;
use vista_train::scene::{CAMERAS_JSON, INPUT_PLY};
use vista_train::{CameraJson, LoaderConfig, ResolutionPolicy, Scene, SceneError};

fn names_of(cameras: &[vista_train::Camera]) -> Vec<String> {
    cameras.iter().map(|c| c.image_name.clone()).collect()
}

#[test]
fn test_missing_sparse_folder_writes_nothing() {
    let names = numbered(2);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());
    fs::remove_dir_all(fixture.source.join("sparse")).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let err = Scene::load(
        &fixture.source,
        &fixture.output,
        true,
        &[1.0],
        &LoaderConfig::default(),
        &mut rng,
    )
    .unwrap_err();

    assert!(matches!(err, SceneError::MissingSparseFolder(_)), "{err:?}");
    assert!(!fixture.output.join(INPUT_PLY).exists());
    assert!(!fixture.output.join(CAMERAS_JSON).exists());
}

#[test]
fn test_manifest_lists_test_then_train() {
    let names = numbered(10);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());
    let config = LoaderConfig {
        eval: true,
        ..Default::default()
    };

    let mut rng = StdRng::seed_from_u64(1);
    let scene = Scene::load(&fixture.source, &fixture.output, true, &[1.0], &config, &mut rng)
        .unwrap();
    assert_eq!(scene.test_cameras(1.0).unwrap().len(), 2);
    assert_eq!(scene.train_cameras(1.0).unwrap().len(), 8);

    let manifest: Vec<CameraJson> =
        serde_json::from_slice(&fs::read(fixture.output.join(CAMERAS_JSON)).unwrap()).unwrap();
    assert_eq!(manifest.len(), 10);
    for (index, record) in manifest.iter().enumerate() {
        assert_eq!(record.id, index);
        assert_eq!((record.width, record.height), (WIDTH, HEIGHT));
    }

    // Manifest order is fixed before shuffling: held-out cameras 00 and 08
    // first, then the training cameras in name order.
    let img_names: Vec<_> = manifest.iter().map(|r| r.img_name.as_str()).collect();
    assert_eq!(
        img_names,
        ["00", "08", "01", "02", "03", "04", "05", "06", "07", "09"]
    );
}

#[test]
fn test_input_ply_copies_source_point_cloud() {
    let names = numbered(3);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());

    let mut rng = StdRng::seed_from_u64(2);
    let scene = Scene::load(
        &fixture.source,
        &fixture.output,
        false,
        &[1.0],
        &LoaderConfig::default(),
        &mut rng,
    )
    .unwrap();

    let source_ply = fs::read(fixture.source.join("sparse/0/points3D.ply")).unwrap();
    let copied = fs::read(fixture.output.join(INPUT_PLY)).unwrap();
    assert_eq!(source_ply, copied);
    assert_eq!(scene.point_cloud.len(), 3);
}

#[test]
fn test_unshuffled_order_matches_scene_info() {
    let names = numbered(5);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());
    let config = LoaderConfig::default();

    let mut rng = StdRng::seed_from_u64(3);
    let scene = Scene::load(&fixture.source, &fixture.output, false, &[1.0, 2.0], &config, &mut rng)
        .unwrap();

    let info = read_colmap_scene_info(&fixture.source, &config.images, config.eval).unwrap();
    let expected: Vec<_> = info.train_cameras.iter().map(|c| c.image_name.clone()).collect();

    for scale in [1.0, 2.0] {
        assert_eq!(names_of(scene.train_cameras(scale).unwrap()), expected);
        assert!(scene.test_cameras(scale).unwrap().is_empty());
    }

    let half = &scene.train_cameras(2.0).unwrap()[0];
    assert_eq!((half.image_width, half.image_height), (WIDTH / 2, HEIGHT / 2));
    assert!((scene.cameras_extent - info.nerf_normalization.radius).abs() < 1e-12);
}

#[test]
fn test_seeded_shuffle_is_reproducible() {
    let names = numbered(9);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());
    let config = LoaderConfig::default();

    let load = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        Scene::load(&fixture.source, &fixture.output, true, &[1.0, 2.0], &config, &mut rng)
            .unwrap()
    };
    let first = load(7);
    let second = load(7);

    let order = names_of(first.train_cameras(1.0).unwrap());
    assert_eq!(order, names_of(second.train_cameras(1.0).unwrap()));
    // Every scale shares the shuffled order.
    assert_eq!(order, names_of(first.train_cameras(2.0).unwrap()));

    let mut sorted = order.clone();
    sorted.sort();
    let expected: Vec<_> = names.iter().map(|n| n.trim_end_matches(".png").to_string()).collect();
    assert_eq!(sorted, expected);

    let uids: Vec<_> = first.train_cameras(1.0).unwrap().iter().map(|c| c.uid).collect();
    assert_eq!(uids, (0..9).collect::<Vec<_>>());
}

#[test]
fn test_scale_lookup() {
    let names = numbered(2);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());

    let mut rng = StdRng::seed_from_u64(4);
    let scene = Scene::load(
        &fixture.source,
        &fixture.output,
        true,
        &[2.0, 1.0],
        &LoaderConfig::default(),
        &mut rng,
    )
    .unwrap();

    assert_eq!(scene.resolution_scales().collect::<Vec<_>>(), [1.0, 2.0]);
    assert!(!scene.train_cameras(2.0).unwrap().is_empty());
    assert!(matches!(
        scene.train_cameras(4.0),
        Err(SceneError::UnknownScale(s)) if s == 4.0
    ));
    assert!(matches!(scene.test_cameras(0.5), Err(SceneError::UnknownScale(_))));
}

#[test]
fn test_invalid_scale_is_rejected_before_writing() {
    let names = numbered(2);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());

    let mut rng = StdRng::seed_from_u64(5);
    let err = Scene::load(
        &fixture.source,
        &fixture.output,
        false,
        &[1.0, -1.0],
        &LoaderConfig::default(),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, SceneError::InvalidScale(_)));
    assert!(!fixture.output.exists());
}

#[test]
fn test_shuffle_reorders_train_then_test() {
    let names = numbered(20);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());
    let config = LoaderConfig {
        eval: true,
        ..Default::default()
    };

    let mut rng = StdRng::seed_from_u64(11);
    let scene = Scene::load(&fixture.source, &fixture.output, true, &[1.0, 2.0], &config, &mut rng)
        .unwrap();

    let info = read_colmap_scene_info(&fixture.source, &config.images, config.eval).unwrap();
    let mut train: Vec<_> = info.train_cameras.iter().map(|c| c.image_name.clone()).collect();
    let mut test: Vec<_> = info.test_cameras.iter().map(|c| c.image_name.clone()).collect();
    let train_by_name = train.clone();

    // Same rng stream: train is shuffled first, then test.
    let mut rng = StdRng::seed_from_u64(11);
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    assert_ne!(train, train_by_name);
    for scale in [1.0, 2.0] {
        assert_eq!(names_of(scene.train_cameras(scale).unwrap()), train);
        assert_eq!(names_of(scene.test_cameras(scale).unwrap()), test);
    }
}

#[test]
fn test_zero_divisor_is_rejected_before_writing() {
    let names = numbered(2);
    let fixture = colmap_scene(&names.iter().map(String::as_str).collect::<Vec<_>>());
    let config = LoaderConfig {
        resolution: ResolutionPolicy::Divisor(0),
        ..Default::default()
    };

    let mut rng = StdRng::seed_from_u64(6);
    let err = Scene::load(&fixture.source, &fixture.output, false, &[1.0], &config, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SceneError::InvalidResolution(_)));
    assert!(!fixture.output.exists());
}

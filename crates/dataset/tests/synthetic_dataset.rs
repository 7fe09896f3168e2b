use dataset::{split_indices, DatasetConfig, DatasetError, LabelTable, SplitSamples};
use image::RgbImage;
use std::fs;
use std::io::Write;
use std::path::Path;

type B = burn_ndarray::NdArray<f32>;

fn write_image(path: &Path, width: u32, height: u32, shade: u8) {
    let mut img = RgbImage::new(width, height);
    for p in img.pixels_mut() {
        *p = image::Rgb([shade, shade / 2, 255 - shade]);
    }
    img.save(path).expect("write png");
}

/// Dataset root with `count` 8x8 images and two measurement columns.
fn write_dataset(root: &Path, count: usize) {
    let mut csv = fs::File::create(root.join("labels.csv")).expect("create labels.csv");
    writeln!(csv, "image,density,porosity").unwrap();
    for i in 0..count {
        let name = format!("img{i}.png");
        write_image(&root.join(&name), 8, 8, (i * 10 % 256) as u8);
        writeln!(csv, "{name},{},{}", 10.0 + i as f32, 100.0 - i as f32).unwrap();
    }
}

fn config(root: &Path) -> DatasetConfig {
    DatasetConfig {
        root: root.to_path_buf(),
        target_column: 0,
        test_fraction: 0.25,
        seed: 42,
    }
}

#[test]
fn load_splits_and_normalizes_targets() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path(), 12);

    let cfg = config(temp.path());
    let split = SplitSamples::load(&cfg).expect("load");
    assert_eq!(split.train.len() + split.test.len(), 12);
    assert_eq!(split.test.len(), 3);
    assert_eq!((split.width, split.height), (8, 8));

    // Per-sample targets are the raw column values pushed through the stats.
    let table = LabelTable::load(temp.path()).unwrap();
    let raw = table.targets(0).unwrap();
    let indices = split_indices(12, 0.25, 42);
    for (sample, &i) in split.train.iter().zip(indices.train.iter()) {
        let expected = split.stats.normalize(raw[i]);
        assert!((sample.target - expected).abs() < 1e-6);
        assert!((split.stats.denormalize(sample.target) - raw[i]).abs() < 1e-3);
    }
}

#[test]
fn batch_iter_visits_every_sample_with_short_final_batch() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path(), 10);

    let split = SplitSamples::load(&config(temp.path())).unwrap();
    assert_eq!(split.train.len(), 7);

    let device = Default::default();
    let mut iter = split.train_iter(Some(7));
    let mut seen = 0;
    let mut batches = Vec::new();
    while let Some((images, targets)) = iter.next_batch::<B>(3, &device) {
        assert_eq!(images.dims()[1..], [3, 8, 8]);
        assert_eq!(targets.dims()[0], images.dims()[0]);
        seen += images.dims()[0];
        batches.push(images.dims()[0]);
    }
    assert_eq!(seen, 7);
    assert_eq!(batches, vec![3, 3, 1]);
}

#[test]
fn shuffled_epochs_replay_for_a_fixed_seed() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path(), 9);
    let split = SplitSamples::load(&config(temp.path())).unwrap();

    let device = Default::default();
    let collect = |seed: u64| {
        let mut iter = split.train_iter(Some(seed));
        let mut targets = Vec::new();
        while let Some((_, t)) = iter.next_batch::<B>(4, &device) {
            targets.extend(t.into_data().to_vec::<f32>().unwrap());
        }
        targets
    };
    assert_eq!(collect(3), collect(3));
    assert_ne!(collect(3), collect(4));
}

#[test]
fn test_iter_is_unshuffled_and_covers_the_split() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path(), 8);
    let split = SplitSamples::load(&config(temp.path())).unwrap();

    let device = Default::default();
    let mut iter = split.test_iter();
    let mut targets = Vec::new();
    while let Some((_, t)) = iter.next_batch::<B>(3, &device) {
        targets.extend(t.into_data().to_vec::<f32>().unwrap());
    }
    let expected: Vec<f32> = split.test.iter().map(|s| s.target).collect();
    assert_eq!(targets, expected);
}

#[test]
fn whole_split_tensors_match_sample_counts() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path(), 8);
    let split = SplitSamples::load(&config(temp.path())).unwrap();

    let device = Default::default();
    let raw = split.tensors::<B>(&device);
    assert_eq!(raw.train_images.dims(), [6, 3, 8, 8]);
    assert_eq!(raw.test_images.dims(), [2, 3, 8, 8]);
    assert_eq!(raw.train_targets.len(), 6);
    assert_eq!(raw.test_targets.len(), 2);
}

#[test]
fn second_measurement_column_is_selectable() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path(), 6);

    let table = LabelTable::load(temp.path()).unwrap();
    assert_eq!(table.measurement_columns(), 2);
    let porosity = table.targets(1).unwrap();
    assert_eq!(porosity[0], 100.0);
    assert_eq!(porosity[5], 95.0);
}

#[test]
fn out_of_range_column_is_a_typed_error() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path(), 4);

    let table = LabelTable::load(temp.path()).unwrap();
    match table.targets(2) {
        Err(DatasetError::Column { column, available }) => {
            assert_eq!(column, 2);
            assert_eq!(available, 2);
        }
        other => panic!("expected column error, got {other:?}"),
    }
}

#[test]
fn non_numeric_measurement_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    write_image(&temp.path().join("a.png"), 8, 8, 10);
    let mut csv = fs::File::create(temp.path().join("labels.csv")).unwrap();
    writeln!(csv, "image,density").unwrap();
    writeln!(csv, "a.png,not-a-number").unwrap();
    drop(csv);

    match LabelTable::load(temp.path()) {
        Err(DatasetError::Label { row, msg, .. }) => {
            assert_eq!(row, 0);
            assert!(msg.contains("non-numeric"));
        }
        other => panic!("expected label error, got {other:?}"),
    }
}

#[test]
fn mixed_image_dimensions_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    write_image(&temp.path().join("a.png"), 8, 8, 10);
    write_image(&temp.path().join("b.png"), 16, 16, 20);
    let mut csv = fs::File::create(temp.path().join("labels.csv")).unwrap();
    writeln!(csv, "image,density").unwrap();
    writeln!(csv, "a.png,1.0").unwrap();
    writeln!(csv, "b.png,2.0").unwrap();
    drop(csv);

    let cfg = DatasetConfig {
        root: temp.path().to_path_buf(),
        target_column: 0,
        test_fraction: 0.0,
        seed: 0,
    };
    assert!(matches!(
        SplitSamples::load(&cfg),
        Err(DatasetError::Shape { .. })
    ));
}

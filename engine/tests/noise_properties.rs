use noise_gallery_engine::fractal::fractal_sample;
use noise_gallery_engine::pages::{FractalPage, Page, PerlinPage};
use noise_gallery_engine::raster::to_gray;
use noise_gallery_engine::{FractalSettings, NoiseField, PerlinGenerator, PermutationTable, Seed};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn same_table_same_value() {
    let table = PermutationTable::from_seed(Seed(11));
    let a = NoiseField::new(&table);
    let b = NoiseField::new(&table);
    for &(x, y) in &[(0.0, 0.0), (3.7, -12.25), (-0.001, 1e6), (255.5, 256.5)] {
        assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
    }
}

#[test]
fn samples_stay_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let generator = PerlinGenerator::new(&mut rng);
    let field = generator.field();
    for _ in 0..10_000 {
        let x = rng.gen_range(-1000.0..1000.0);
        let y = rng.gen_range(-1000.0..1000.0);
        let v = field.sample(x, y);
        assert!((0.0..=1.0).contains(&v), "sample({x}, {y}) = {v}");
    }
}

#[test]
fn fractal_stays_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(99);
    let generator = PerlinGenerator::new(&mut rng);
    let settings = FractalSettings { scale: 0.05, octaves: 6, persistence: 0.6, lacunarity: 2.1 };
    for _ in 0..2_000 {
        let x = rng.gen_range(0.0..400.0);
        let y = rng.gen_range(0.0..400.0);
        let v = generator.field().fractal_sample(x, y, &settings);
        assert!((0.0..=1.0).contains(&v), "fractal({x}, {y}) = {v}");
    }
}

#[test]
fn single_octave_is_the_scaled_base_sample() {
    let generator = PerlinGenerator::from_seed(Seed(4));
    let field = generator.field();
    let settings = FractalSettings { scale: 0.02, octaves: 1, ..Default::default() };
    for &(x, y) in &[(0.0, 0.0), (17.0, 301.0), (399.0, 42.0)] {
        assert_eq!(fractal_sample(&field, x, y, &settings), field.sample(x * 0.02, y * 0.02));
    }
}

#[test]
fn freshly_shuffled_tables_are_permutations() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let table = PermutationTable::new(&mut rng);
        assert!(table.is_valid());
        let mut first: Vec<u8> = table.as_slice()[..256].to_vec();
        first.sort_unstable();
        assert!(first.iter().enumerate().all(|(i, &v)| i == v as usize));
        assert_eq!(&table.as_slice()[..256], &table.as_slice()[256..]);
    }
}

#[test]
fn negative_coordinates_are_defined_and_periodic() {
    let generator = PerlinGenerator::from_seed(Seed(8));
    let field = generator.field();
    let v = field.sample(-3.5, -0.25);
    assert!(v.is_finite() && (0.0..=1.0).contains(&v));
    assert_eq!(v, field.sample(-3.5 + 256.0, -0.25 + 256.0));
}

#[test]
fn lattice_points_are_mid_gray() {
    let generator = PerlinGenerator::from_seed(Seed(21));
    let field = generator.field();
    for &(x, y) in &[(0.0, 0.0), (5.0, -9.0), (-128.0, 77.0)] {
        assert_eq!(field.sample(x, y), 0.5);
    }
}

#[test]
fn identity_table_origin_renders_gray_127() {
    let table = PermutationTable::identity();
    let page = PerlinPage { size: 4, ..Default::default() };
    let raster = page.render(NoiseField::new(&table));
    assert_eq!(raster.pixel(0, 0), [127, 127, 127, 255]);
    assert_eq!(to_gray(0.5), 127);
}

#[test]
fn fractal_page_renders_requested_size() {
    let generator = PerlinGenerator::from_seed(Seed(2));
    let page = FractalPage { size: 24, ..Default::default() };
    let raster = page.render(generator.field());
    assert_eq!((raster.width(), raster.height()), (24, 24));
    assert!(raster.as_bytes().chunks(4).all(|px| px[0] == px[1] && px[1] == px[2] && px[3] == 255));
    assert!(Page::Fractal.is_raster());
}

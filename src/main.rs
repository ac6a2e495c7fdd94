use std::{env, fs};

use anyhow::Context;
use log::info;
use machine_learning::{
    arch::{Device, Model},
    dcgan::{ArchitectureConfig, DiscriminatorBuilder, GeneratorBuilder},
    initialize_weights,
};
use rand::{SeedableRng, rngs::StdRng};
use specs::RunSpec;

const SPEC_VAR: &str = "DCGAN_SPEC";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = read_spec()?;
    let device = if spec.parallel {
        Device::Parallel
    } else {
        Device::Cpu
    };

    let generator =
        GeneratorBuilder::new(device).build(&ArchitectureConfig::generator(&spec.generator))?;
    let discriminator = DiscriminatorBuilder::new(device)
        .build(&ArchitectureConfig::discriminator(&spec.discriminator))?;
    info!(
        generator = generator.size(),
        discriminator = discriminator.size();
        "built networks"
    );

    let mut rng = generate_rng(spec.seed);
    let g_params = initialize_weights(generator.model(), &mut rng)?;
    let d_params = initialize_weights(discriminator.model(), &mut rng)?;

    let z = generator.sampler(spec.batch_size, &mut rng);
    let images = generator.forward(&g_params, z.view())?;
    info!("generated images of shape {:?}", images.shape());

    let scores = discriminator.forward(&d_params, images.view())?;
    info!("discriminator scores {scores}");

    Ok(())
}

/// Reads the run spec from the path given as first argument or in `DCGAN_SPEC`, running with
/// the defaults if there's none.
fn read_spec() -> anyhow::Result<RunSpec> {
    let Some(path) = env::args().nth(1).or_else(|| env::var(SPEC_VAR).ok()) else {
        info!("no run spec given, using defaults");
        return Ok(RunSpec::default());
    };

    let json = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let spec = RunSpec::from_json(&json).with_context(|| format!("parsing {path}"))?;
    info!("loaded run spec from {path}");
    Ok(spec)
}

fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

use canopy::prelude::*;
use canopy_ensemble::{OrdinalScale, RandomForestParams};
use ndarray::Axis;
use rand::{rngs::SmallRng, SeedableRng};

fn main() -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(42);

    // 1000 respondents answering 10 questions, the score follows the first three
    let (train, valid) =
        canopy_datasets::generate::survey(1000, 10, 0.5, &mut rng).split_with_ratio(0.8);

    println!(
        "Training on {} samples, validating on {} samples",
        train.nsamples(),
        valid.nsamples()
    );

    let params = RandomForestParams::new_fixed_rng(rng)
        .n_estimators(100)
        .max_depth(6)
        .min_samples_split(10);
    let forest = params.fit(&train)?;

    let pred = forest.predict(&valid);

    println!("RMSE: {:.3}", pred.root_mean_squared_error(valid.targets())?);
    println!("MAE:  {:.3}", pred.mean_absolute_error(valid.targets())?);
    println!("R2:   {:.3}", pred.r2(valid.targets())?);

    let cv_errors = train.cross_validate_rmse(5, &params)?;
    println!(
        "5-fold CV RMSE: {:.3} (+/- {:.3})",
        cv_errors.mean().unwrap_or(f64::NAN),
        cv_errors.std(0.)
    );

    let levels = OrdinalScale::default().levels(&pred);
    let exact = levels
        .iter()
        .zip(valid.targets().iter())
        .filter(|(level, y)| **level == y.round() as i64)
        .count();
    println!(
        "Exact answer level for {:.1}% of the respondents",
        100. * exact as f64 / valid.nsamples() as f64
    );

    println!("Feature importance:");
    for (name, importance) in train
        .feature_names()
        .iter()
        .zip(forest.feature_importance().iter())
    {
        println!("  {:<12} {:.3}", name, importance);
    }

    let first = valid.records().index_axis(Axis(0), 0).insert_axis(Axis(0));
    println!("First respondent: {}", forest.predict(&first));

    Ok(())
}

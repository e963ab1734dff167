/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The `portmat` diagnostic driver.
//!
//! Each subcommand reads a matrix (a JSON array of rows), runs one kernel
//! operation and prints the result to stdout as a JSON object.

use crate::ui::logging::GlobalLogger;
use crate::CliError;

use ::clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use ::portmat_config::{Settings, YamlRead};
use ::portmat_linalg::{self as linalg, Cholesky, Matrix};
use ::rand::rngs::StdRng;
use ::rand::SeedableRng;
use ::serde_json::{json, Value};
use ::std::fs::File;
use ::std::io::BufReader;
use ::std::path::Path;

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> Result<(), CliError>,
{
    use ::std::error::Error;

    main().unwrap_or_else(|e| {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("caused by: {}", cause);
            source = cause.source();
        }
        ::std::process::exit(1);
    });
}

const MATRIX_COMMANDS: &[(&str, &str)] = &[
    ("qr", "QR decomposition by Givens rotations"),
    ("lu", "LU decomposition with complete pivoting"),
    ("det", "determinant"),
    ("cholesky", "Cholesky decomposition (plain or pivoted, per config)"),
    ("eig", "symmetric eigendecomposition"),
    ("svd", "singular value decomposition"),
    ("null-space", "orthonormal basis of the null space"),
    ("correlation", "correlation matrix and variances of a covariance matrix"),
    ("ftca", "threshold clustering of a correlation matrix"),
];

fn common_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(Arg::with_name("config")
            .short("c").long("config")
            .takes_value(true).value_name("CONFIG")
            .help("settings yaml; missing sections take their defaults"))
        .arg(Arg::with_name("verbose")
            .short("v").long("verbose")
            .multiple(true)
            .help("trace output from the numerical kernels"))
}

fn input_arg<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(Arg::with_name("input")
        .required(true).value_name("INPUT")
        .help("matrix as a JSON array of rows"))
}

fn build_app<'a, 'b>() -> App<'a, 'b> {
    let mut app = App::new("portmat")
        .about("Dense matrix kernel for portfolio math")
        .setting(AppSettings::SubcommandRequiredElseHelp);

    for &(name, about) in MATRIX_COMMANDS {
        app = app.subcommand(common_args(input_arg(SubCommand::with_name(name).about(about))));
    }
    app.subcommand(common_args(input_arg(
            SubCommand::with_name("solve")
                .about("least-squares solution of A·x = b by extended Kaczmarz")
                .arg(Arg::with_name("rhs")
                    .long("rhs").required(true)
                    .takes_value(true).value_name("RHS")
                    .help("right-hand side as a JSON array of rows")),
        )))
        .subcommand(common_args(
            SubCommand::with_name("random-correlation")
                .about("random correlation matrix")
                .arg(Arg::with_name("size")
                    .long("size").required(true)
                    .takes_value(true).value_name("N"))
                .arg(Arg::with_name("seed")
                    .long("seed")
                    .takes_value(true).value_name("S")
                    .help("seed for a reproducible result")),
        ))
}

pub fn portmat() {
    wrap_result_main(|| {
        let matches = build_app().get_matches();
        let (name, sub) = match matches.subcommand() {
            (name, Some(sub)) => (name, sub),
            (name, None) => return Err(CliError::Usage(format!("missing arguments for '{}'", name))),
        };

        GlobalLogger::default()
            .verbosity(sub.occurrences_of("verbose"))
            .apply()?;

        let settings = match sub.value_of("config") {
            Some(path) => Settings::from_reader(BufReader::new(File::open(path)?))?,
            None => Settings::default(),
        };

        let output = run(name, sub, &settings)?;
        println!("{}", ::serde_json::to_string_pretty(&output)?);
        Ok(())
    });
}

fn read_matrix(path: impl AsRef<Path>) -> Result<Matrix, CliError> {
    let file = BufReader::new(File::open(path.as_ref())?);
    Ok(::serde_json::from_reader(file)?)
}

fn parse_arg<T: ::std::str::FromStr>(m: &ArgMatches, name: &str) -> Result<Option<T>, CliError> {
    match m.value_of(name) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| {
            CliError::Usage(format!("invalid value for --{}: '{}'", name, s))
        }),
    }
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Runs one subcommand, producing its JSON output.
pub fn run(name: &str, m: &ArgMatches, settings: &Settings) -> Result<Value, CliError> {
    if name == "random-correlation" {
        let n: usize = parse_arg(m, "size")?
            .ok_or_else(|| CliError::Usage("--size is required".to_string()))?;
        let mut rng = rng_from_seed(parse_arg(m, "seed")?);
        let corr = ::portmat_random::random_correlation(n, &settings.random_correlation, &mut rng)?;
        return Ok(json!({ "correlation": corr }));
    }

    let input = m.value_of("input")
        .ok_or_else(|| CliError::Usage("missing INPUT".to_string()))?;
    let a = read_matrix(input)?;
    debug!("{}: read a {}x{} matrix from {}", name, a.num_rows(), a.num_cols(), input);

    match name {
        "solve" => {
            let rhs = m.value_of("rhs")
                .ok_or_else(|| CliError::Usage("--rhs is required".to_string()))?;
            let b = read_matrix(rhs)?;
            let x = linalg::linsolve_extended_kaczmarz(&a, &b, &settings.kaczmarz)?;
            Ok(json!({ "x": x }))
        },
        _ => run_on_matrix(name, &a, settings),
    }
}

fn run_on_matrix(name: &str, a: &Matrix, settings: &Settings) -> Result<Value, CliError> {
    Ok(match name {
        "qr" => {
            let qr = linalg::qr_decomposition(a)?;
            json!({ "q": qr.q, "r": qr.r })
        },
        "lu" => {
            let lu = linalg::lu_decomposition(a)?;
            json!({
                "l": lu.l,
                "u": lu.u,
                "p": lu.p.indices(),
                "q": lu.q.indices(),
                "determinant": lu.determinant(),
            })
        },
        "det" => json!({ "determinant": linalg::determinant(a)? }),
        "cholesky" => match linalg::cholesky_decomposition(a, &settings.cholesky)? {
            Cholesky::Plain { g } => json!({ "g": g }),
            Cholesky::Pivoted { l, d, p } => json!({ "l": l, "d": d, "p": p.indices() }),
        },
        "eig" => {
            let eigen = linalg::eigen_decomposition(a, &settings.eigen)?;
            json!({ "eigenvalues": eigen.eigenvalues(), "eigenvectors": eigen.v })
        },
        "svd" => {
            let svd = linalg::svd_decomposition(a, &settings.svd)?;
            json!({ "u": svd.u, "s": svd.s, "v": svd.v })
        },
        "null-space" => json!({ "basis": linalg::null_space(a, &settings.null_space)? }),
        "correlation" => json!({
            "correlation": ::portmat_stats::to_correlation_matrix(a)?,
            "variances": ::portmat_stats::variances(a)?.to_array(),
        }),
        "ftca" => json!({ "clusters": ::portmat_stats::ftca(a, &settings.ftca)? }),
        _ => return Err(CliError::Usage(format!("unknown subcommand '{}'", name))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(args: &[&str]) -> ArgMatches<'static> {
        build_app().get_matches_from_safe(args.iter().cloned()).unwrap()
    }

    #[test]
    fn parses_every_subcommand() {
        for &(name, _) in MATRIX_COMMANDS {
            let m = matches(&["portmat", name, "-v", "in.json"]);
            let (got, sub) = m.subcommand();
            assert_eq!(got, name);
            let sub = sub.unwrap();
            assert_eq!(sub.value_of("input"), Some("in.json"));
            assert_eq!(sub.occurrences_of("verbose"), 1);
        }
        let m = matches(&["portmat", "solve", "a.json", "--rhs", "b.json", "-c", "cfg.yaml"]);
        let sub = m.subcommand_matches("solve").unwrap();
        assert_eq!(sub.value_of("rhs"), Some("b.json"));
        assert_eq!(sub.value_of("config"), Some("cfg.yaml"));

        assert!(build_app().get_matches_from_safe(vec!["portmat", "solve", "a.json"]).is_err());
    }

    #[test]
    fn random_correlation_is_seeded() {
        let m = matches(&["portmat", "random-correlation", "--size", "3", "--seed", "5"]);
        let sub = m.subcommand_matches("random-correlation").unwrap();
        let first = run("random-correlation", sub, &Settings::default()).unwrap();
        let second = run("random-correlation", sub, &Settings::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first["correlation"][1][1], json!(1.0));

        let m = matches(&["portmat", "random-correlation", "--size", "three"]);
        let sub = m.subcommand_matches("random-correlation").unwrap();
        assert!(run("random-correlation", sub, &Settings::default()).is_err());
    }

    #[test]
    fn matrix_outputs() {
        let a = Matrix::from_rows(&[[-2.0, 2.0, -3.0], [-1.0, 1.0, 3.0], [2.0, 0.0, -1.0]]).unwrap();
        let out = run_on_matrix("det", &a, &Settings::default()).unwrap();
        assert!((out["determinant"].as_f64().unwrap() - 18.0).abs() < 1e-12);

        let out = run_on_matrix("lu", &a, &Settings::default()).unwrap();
        assert_eq!(out["p"].as_array().unwrap().len(), 3);

        let corr = Matrix::from_rows(&[[1.0, 0.9], [0.9, 1.0]]).unwrap();
        let out = run_on_matrix("ftca", &corr, &Settings::default()).unwrap();
        assert_eq!(out, json!({ "clusters": [[0, 1]] }));

        assert!(run_on_matrix("frobnicate", &a, &Settings::default()).is_err());
    }
}

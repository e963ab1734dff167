/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The YAML settings document read by the `portmat` driver.
//!
//! Every section and every field is optional. An empty document yields
//! `Settings::default()`.

// NOTE: Please read settings through the YamlRead trait, which warns about
//       unrecognized keys. `serde_yaml::from_*` silently drops typos.

#[macro_use]
extern crate log;

use ::portmat_linalg::{CholeskySettings, EigenSettings, KaczmarzSettings, NullSpaceSettings, SvdSettings};
use ::portmat_random::RandomCorrelationSettings;
use ::portmat_stats::FtcaSettings;
use ::serde::{Deserialize, Serialize};
use ::std::io::Read;

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default)]
    pub eigen: EigenSettings,
    #[serde(default)]
    pub svd: SvdSettings,
    #[serde(default)]
    pub cholesky: CholeskySettings,
    #[serde(default)]
    pub null_space: NullSpaceSettings,
    #[serde(default)]
    pub kaczmarz: KaczmarzSettings,
    #[serde(default)]
    pub random_correlation: RandomCorrelationSettings,
    #[serde(default)]
    pub ftca: FtcaSettings,
}

/// Reads YAML through `serde_ignored`, logging a warning for every key that
/// the target type does not recognize.
pub trait YamlRead: for<'de> Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, ::serde_yaml::Error>
    { YamlRead::from_dyn_reader(&mut r) }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, ::serde_yaml::Error> {
        Self::from_value(value_from_dyn_reader(r)?)
    }

    fn from_str(s: &str) -> Result<Self, ::serde_yaml::Error>
    { YamlRead::from_dyn_reader(&mut s.as_bytes()) }

    fn from_value(value: ::serde_yaml::Value) -> Result<Self, ::serde_yaml::Error>;
}

macro_rules! derive_yaml_read {
    ($($Type:ty),* $(,)*) => {$(
        impl YamlRead for $Type {
            fn from_value(value: ::serde_yaml::Value) -> Result<$Type, ::serde_yaml::Error> {
                ::serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                )
            }
        }
    )*};
}

derive_yaml_read! {
    Settings,
    EigenSettings,
    SvdSettings,
    CholeskySettings,
    NullSpaceSettings,
    KaczmarzSettings,
    RandomCorrelationSettings,
    FtcaSettings,
    ::serde_yaml::Value,
}

// An empty document is read as an empty mapping. serde_yaml reports
// EndOfStream for input without any document, so that case is caught first.
fn value_from_dyn_reader(r: &mut dyn Read) -> Result<::serde_yaml::Value, ::serde_yaml::Error> {
    let mut text = String::new();
    r.read_to_string(&mut text).map_err(<::serde_yaml::Error as ::serde::de::Error>::custom)?;
    if text.trim().is_empty() {
        return Ok(::serde_yaml::Value::Mapping(Default::default()));
    }

    let value: ::serde_yaml::Value = ::serde_yaml::from_str(&text)?;
    Ok(match value {
        ::serde_yaml::Value::Null => ::serde_yaml::Value::Mapping(Default::default()),
        value => value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::portmat_linalg::{EigenvalueOrder, Pivoting, SvdForm};
    use ::pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Settings::from_str("").unwrap(), Settings::default());
        assert_eq!(Settings::from_str("{}").unwrap(), Settings::default());
        assert_eq!(Settings::from_str("  \n\n").unwrap(), Settings::default());
        assert_eq!(Settings::from_reader(&b""[..]).unwrap(), Settings::default());
        assert_eq!(FtcaSettings::from_str("").unwrap(), FtcaSettings::default());
    }

    #[test]
    fn partial_sections() {
        let yaml = "
eigen:
  order: descending
  max-iter: 50
svd:
  form: full
cholesky:
  pivoting: complete
  eps-sdp: 1.0e-12
null-space:
  eps: 1.0e-9
kaczmarz:
  randomized: true
  max-iter: ~
random-correlation:
  eigenvalues: [1.5, 0.5]
ftca:
  threshold: 0.7
";
        let settings = Settings::from_str(yaml).unwrap();
        assert_eq!(settings.eigen.order, EigenvalueOrder::Descending);
        assert_eq!(settings.eigen.max_iter, Some(50));
        assert_eq!(settings.eigen.eps_symmetric, 0.0);
        assert_eq!(settings.svd.form, SvdForm::Full);
        assert_eq!(settings.svd.max_iter, SvdSettings::default().max_iter);
        assert_eq!(settings.cholesky.pivoting, Pivoting::Complete);
        assert_eq!(settings.cholesky.eps_sdp, Some(1e-12));
        assert_eq!(settings.null_space.eps, Some(1e-9));
        assert!(settings.kaczmarz.randomized);
        assert_eq!(settings.kaczmarz.max_iter, None);
        assert_eq!(settings.random_correlation.eigenvalues, Some(vec![1.5, 0.5]));
        assert_eq!(settings.ftca.threshold, 0.7);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings = Settings::from_str("eigen:\n  max-itre: 3\nsvdd: {}\n").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn type_errors_are_reported() {
        assert!(Settings::from_str("eigen:\n  max-iter: lots\n").is_err());
        assert!(Settings::from_str("svd:\n  form: skinny\n").is_err());
    }

    #[test]
    fn single_section() {
        let ftca = FtcaSettings::from_reader("threshold: 0.2".as_bytes()).unwrap();
        assert_eq!(ftca.threshold, 0.2);
    }
}

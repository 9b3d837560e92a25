//! # GIS Model
//!
//! A trained maximum entropy model ready for serving: the predicate
//! name table, the outcome names and the immutable evaluation
//! parameters. Nothing here is mutated after construction, so one model
//! can be evaluated from many threads at once.

use std::sync::Arc;

use maxent_core::config::ModelConfig;
use maxent_core::context::Context;
use maxent_core::error::{MaxentError, MaxentResult};
use maxent_core::index_table::IndexHashTable;
use maxent_core::params::EvalParameters;
use maxent_core::prior::UniformPrior;
use maxent_core::traits::{MaxentModel, Prior};
use rayon::prelude::*;

use crate::eval::eval;

/// Maximum entropy model evaluated with the log-linear kernel
pub struct GisModel {
    predicates: IndexHashTable<String>,
    outcome_names: Vec<String>,
    params: Arc<EvalParameters>,
    prior: Box<dyn Prior>,
}

impl GisModel {
    /// Model without correction, default load factor and a uniform prior
    ///
    /// `parameters[i]` belongs to `predicate_labels[i]`.
    pub fn new(
        parameters: Vec<Context>,
        predicate_labels: &[String],
        outcome_names: Vec<String>,
    ) -> MaxentResult<Self> {
        Self::with_config(parameters, predicate_labels, outcome_names, &ModelConfig::default())
    }

    /// Model laid out according to `config`
    pub fn with_config(
        parameters: Vec<Context>,
        predicate_labels: &[String],
        outcome_names: Vec<String>,
        config: &ModelConfig,
    ) -> MaxentResult<Self> {
        if parameters.len() != predicate_labels.len() {
            return Err(MaxentError::length_mismatch(
                "model parameters",
                predicate_labels.len(),
                parameters.len(),
            ));
        }

        let predicates = IndexHashTable::new(predicate_labels, config.load_factor)?;
        let params = EvalParameters::with_correction(
            parameters,
            config.correction_param,
            config.correction_constant,
            outcome_names.len(),
        )?;

        let mut prior = UniformPrior::new();
        prior.set_labels(&outcome_names, predicate_labels);

        Ok(Self {
            predicates,
            outcome_names,
            params: Arc::new(params),
            prior: Box::new(prior),
        })
    }

    /// Replace the prior distribution
    pub fn with_prior(mut self, mut prior: impl Prior + 'static) -> Self {
        prior.set_labels(&self.outcome_names, &self.predicates.to_vec());
        self.prior = Box::new(prior);
        self
    }

    /// Evaluate many contexts in parallel
    pub fn evaluate_batch(&self, contexts: &[Vec<String>]) -> Vec<Vec<f64>> {
        contexts
            .par_iter()
            .map(|ctx| {
                let names: Vec<&str> = ctx.iter().map(String::as_str).collect();
                self.evaluate(&names)
            })
            .collect()
    }

    /// Id of a predicate name, `None` if it is not in the model
    pub fn predicate_index(&self, predicate: &str) -> Option<usize> {
        self.predicates.get(predicate)
    }

    pub fn predicates(&self) -> &IndexHashTable<String> {
        &self.predicates
    }

    /// Predicate names ordered by id
    pub fn predicate_labels(&self) -> Vec<String> {
        self.predicates.to_vec()
    }

    pub fn outcome_names(&self) -> &[String] {
        &self.outcome_names
    }

    /// Shared handle to the evaluation parameters
    pub fn eval_parameters(&self) -> Arc<EvalParameters> {
        Arc::clone(&self.params)
    }

    pub fn correction_constant(&self) -> u32 {
        self.params.correction_constant()
    }

    pub fn correction_param(&self) -> f64 {
        self.params.correction_param()
    }

    fn eval_names(&self, context: &[&str], values: Option<&[f32]>, out: &mut [f64]) {
        let mut ids = Vec::with_capacity(context.len());
        let mut weights: Option<Vec<f32>> = values.map(|_| Vec::with_capacity(context.len()));
        for (i, name) in context.iter().enumerate() {
            if let Some(pid) = self.predicates.get(*name) {
                ids.push(pid);
                if let (Some(w), Some(v)) = (weights.as_mut(), values) {
                    w.push(v[i]);
                }
            }
        }

        out.fill(0.0);
        let prior = self.prior.log_prior(&ids, weights.as_deref());
        for (o, p) in out.iter_mut().zip(prior) {
            *o = p;
        }
        eval(&ids, weights.as_deref(), out, &self.params);
    }
}

impl MaxentModel for GisModel {
    fn evaluate(&self, context: &[&str]) -> Vec<f64> {
        let mut out = vec![0.0; self.num_outcomes()];
        self.eval_names(context, None, &mut out);
        out
    }

    fn evaluate_with_values(&self, context: &[&str], values: &[f32]) -> MaxentResult<Vec<f64>> {
        if values.len() != context.len() {
            return Err(MaxentError::length_mismatch(
                "context values",
                context.len(),
                values.len(),
            ));
        }
        let mut out = vec![0.0; self.num_outcomes()];
        self.eval_names(context, Some(values), &mut out);
        Ok(out)
    }

    fn evaluate_into(&self, context: &[&str], probabilities: &mut [f64]) -> MaxentResult<()> {
        if probabilities.len() != self.num_outcomes() {
            return Err(MaxentError::length_mismatch(
                "probabilities",
                self.num_outcomes(),
                probabilities.len(),
            ));
        }
        self.eval_names(context, None, probabilities);
        Ok(())
    }

    fn best_outcome(&self, outcomes: &[f64]) -> &str {
        let mut best = 0;
        for (i, &p) in outcomes.iter().enumerate().skip(1) {
            if p > outcomes[best] {
                best = i;
            }
        }
        self.outcome_names.get(best).map_or("", String::as_str)
    }

    fn all_outcomes(&self, outcomes: &[f64]) -> MaxentResult<String> {
        if outcomes.len() != self.outcome_names.len() {
            return Err(MaxentError::invalid_argument(format!(
                "the length of the outcomes ({}) must be the same as the length of outcome names ({})",
                outcomes.len(),
                self.outcome_names.len()
            )));
        }
        Ok(self
            .outcome_names
            .iter()
            .zip(outcomes)
            .map(|(name, p)| format!("{}[{:07.4}]", name, p))
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn outcome(&self, index: usize) -> Option<&str> {
        self.outcome_names.get(index).map(String::as_str)
    }

    fn index(&self, outcome: &str) -> Option<usize> {
        self.outcome_names.iter().position(|o| o == outcome)
    }

    fn num_outcomes(&self) -> usize {
        self.params.num_outcomes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn weather_model() -> GisModel {
        let params = vec![
            // "cloudy"
            Context::new(vec![0, 1], vec![1.5, -0.5]).unwrap(),
            // "sunny"
            Context::new(vec![1], vec![2.0]).unwrap(),
            // "windy"
            Context::new(vec![0, 1, 2], vec![0.2, 0.1, 0.7]).unwrap(),
        ];
        GisModel::new(
            params,
            &labels(&["cloudy", "sunny", "windy"]),
            labels(&["rain", "dry", "storm"]),
        )
        .unwrap()
    }

    #[test]
    fn test_evaluate_is_distribution() {
        let model = weather_model();
        let p = model.evaluate(&["cloudy", "windy"]);
        assert_eq!(p.len(), 3);
        assert!(p.iter().all(|&x| x >= 0.0));
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(model.best_outcome(&p), "rain");
    }

    #[test]
    fn test_unknown_predicates_ignored() {
        let model = weather_model();
        let with_unknown = model.evaluate(&["sunny", "foggy"]);
        let without = model.evaluate(&["sunny"]);
        assert_eq!(with_unknown, without);
        assert_eq!(model.best_outcome(&without), "dry");
    }

    #[test]
    fn test_values_align_after_unknowns() {
        let model = weather_model();
        let p = model
            .evaluate_with_values(&["foggy", "sunny"], &[10.0, 0.5])
            .unwrap();
        let q = model.evaluate_with_values(&["sunny"], &[0.5]).unwrap();
        assert_eq!(p, q);

        assert!(model.evaluate_with_values(&["sunny"], &[0.5, 1.0]).is_err());
    }

    #[test]
    fn test_evaluate_into() {
        let model = weather_model();
        let mut buf = vec![0.3; 3];
        model.evaluate_into(&["sunny"], &mut buf).unwrap();
        assert_eq!(buf, model.evaluate(&["sunny"]));

        let mut short = vec![0.0; 2];
        assert!(model.evaluate_into(&["sunny"], &mut short).is_err());
    }

    #[test]
    fn test_best_outcome_first_wins_ties() {
        let model = weather_model();
        assert_eq!(model.best_outcome(&[0.25, 0.5, 0.5]), "dry");
        assert_eq!(model.best_outcome(&[1.0 / 3.0; 3]), "rain");
    }

    #[test]
    fn test_all_outcomes() {
        let model = weather_model();
        let text = model.all_outcomes(&[0.5, 0.25, 0.25]).unwrap();
        assert_eq!(text, "rain[00.5000] dry[00.2500] storm[00.2500]");

        let err = model.all_outcomes(&[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, MaxentError::InvalidArgument(_)));
    }

    #[test]
    fn test_outcome_lookup() {
        let model = weather_model();
        assert_eq!(model.outcome(2), Some("storm"));
        assert_eq!(model.outcome(3), None);
        assert_eq!(model.index("dry"), Some(1));
        assert_eq!(model.index("hail"), None);
        assert_eq!(model.predicate_index("windy"), Some(2));
        assert_eq!(model.predicate_labels(), labels(&["cloudy", "sunny", "windy"]));
    }

    #[test]
    fn test_parameter_count_must_match_labels() {
        let params = vec![Context::new(vec![0], vec![1.0]).unwrap()];
        let err = GisModel::new(params, &labels(&["a", "b"]), labels(&["x"]));
        assert!(err.is_err());
    }

    #[test]
    fn test_duplicate_predicate_labels_rejected() {
        let params = vec![
            Context::new(vec![0], vec![1.0]).unwrap(),
            Context::new(vec![0], vec![1.0]).unwrap(),
        ];
        let err = GisModel::new(params, &labels(&["a", "a"]), labels(&["x"]));
        assert!(matches!(err, Err(MaxentError::DuplicateKey { index: 1 })));
    }

    #[test]
    fn test_evaluate_batch_matches_sequential() {
        let model = weather_model();
        let contexts: Vec<Vec<String>> = vec![
            labels(&["cloudy"]),
            labels(&["sunny", "windy"]),
            labels(&[]),
            labels(&["nope"]),
        ];
        let batch = model.evaluate_batch(&contexts);
        for (ctx, p) in contexts.iter().zip(&batch) {
            let names: Vec<&str> = ctx.iter().map(String::as_str).collect();
            assert_eq!(p, &model.evaluate(&names));
        }
    }

    /// Prior with fixed outcome probabilities
    struct FixedPrior {
        probs: Vec<f64>,
        num_outcomes: usize,
    }

    impl Prior for FixedPrior {
        fn set_labels(&mut self, outcome_labels: &[String], _context_labels: &[String]) {
            self.num_outcomes = outcome_labels.len();
        }

        fn log_prior(&self, _context: &[usize], _values: Option<&[f32]>) -> Vec<f64> {
            assert_eq!(self.probs.len(), self.num_outcomes);
            self.probs.iter().map(|p| p.ln()).collect()
        }
    }

    #[test]
    fn test_with_prior_shifts_distribution() {
        let uniform = weather_model().evaluate(&[]);
        for p in &uniform {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }

        let model = weather_model().with_prior(FixedPrior {
            probs: vec![0.2, 0.3, 0.5],
            num_outcomes: 0,
        });
        let p = model.evaluate(&["unknown"]);
        assert!((p[0] - 0.2).abs() < 1e-9);
        assert!((p[1] - 0.3).abs() < 1e-9);
        assert!((p[2] - 0.5).abs() < 1e-9);
        assert_eq!(model.best_outcome(&p), "storm");

        let with_feature = model.evaluate(&["sunny"]);
        assert!(with_feature[1] > p[1]);
        assert!((with_feature.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correction_config() {
        let config = ModelConfig {
            correction_constant: 2,
            correction_param: 0.5,
            ..Default::default()
        };
        let params = vec![Context::new(vec![0, 1], vec![1.0, -1.0]).unwrap()];
        let model = GisModel::with_config(params, &labels(&["p"]), labels(&["a", "b"]), &config).unwrap();

        assert_eq!(model.correction_constant(), 2);
        assert_eq!(model.eval_parameters().constant_inverse(), 0.5);
        let p = model.evaluate(&["p"]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(p[0] > p[1]);
    }
}

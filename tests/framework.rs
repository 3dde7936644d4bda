//! End-to-end behavior of the transformer framework: lifecycle, parameter
//! introspection, labels, citations and the JSON document form.

use std::sync::Arc;

use featforge::feature::{
    BaseConfig, BaseFeature, DEFAULT_CITATION, Error, Feature, FeatureKind, Input, InputType,
    Introspect, KeepLast, Param, ParamKind, ParamSpec, RawInput, SaveTarget, SetUnion,
};
use serde_json::{Value, json};
use std::collections::BTreeSet;

// =============================================================================
// Test transformers
// =============================================================================

static TEST_FEATURE_1: FeatureKind = FeatureKind {
    name: "TestFeature1",
    module: module_path!(),
    parent: None,
    params: &[
        ParamSpec::new("data", ParamKind::Any),
        ParamSpec::new("value", ParamKind::Any),
    ],
    attributes: &["data"],
    references: &["Doe, J. Nature. (2016)."],
};

/// Fit stores `[1]`; every transformed row is `[1]`.
#[derive(Default)]
struct TestFeature1 {
    base: BaseConfig,
    data: Param,
    value: Param,
}

impl Introspect for TestFeature1 {
    fn kind(&self) -> &'static FeatureKind {
        &TEST_FEATURE_1
    }

    fn base(&self) -> &BaseConfig {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseConfig {
        &mut self.base
    }

    fn param(&self, name: &str) -> Option<Param> {
        match name {
            "data" => Some(self.data.clone()),
            "value" => Some(self.value.clone()),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: Param) -> Result<(), Error> {
        match name {
            "data" => self.data = value,
            "value" => self.value = value,
            _ => return Err(Error::UnknownParam(name.to_string())),
        }
        Ok(())
    }

    fn attribute(&self, name: &str) -> Result<Option<Value>, Error> {
        match name {
            "data" if self.data.is_none() => Ok(None),
            "data" => self.data.to_json().map(Some),
            _ => Err(Error::UnknownAttribute(name.to_string())),
        }
    }

    fn label_groups(&self) -> Vec<Vec<String>> {
        vec![vec!["C".into(), "B".into(), "A".into()]]
    }
}

impl Feature for TestFeature1 {
    type Partial = ();
    type Merge = KeepLast;

    fn fit_one(&self, _input: &Input) -> Result<(), Error> {
        Ok(())
    }

    fn assign(&mut self, _merged: ()) -> Result<(), Error> {
        self.data = Param::List(vec![Param::Int(1)]);
        Ok(())
    }

    fn transform_one(&self, _input: &Input) -> Result<Vec<f64>, Error> {
        Ok(vec![1.0])
    }
}

static TEST_FEATURE_2: FeatureKind = FeatureKind {
    name: "TestFeature2",
    module: module_path!(),
    parent: None,
    params: &[],
    attributes: &["data1", "data2"],
    references: &["Doe, J. Nature. (2016).", "Smith, J. Science. (2010)."],
};

static TEST_FEATURE_3: FeatureKind = FeatureKind {
    name: "TestFeature3",
    module: module_path!(),
    parent: Some(&TEST_FEATURE_2),
    params: &[],
    attributes: &[],
    references: &[],
};

/// Two attribute slots and two label groups; `kind` picks the manifest.
struct Manifest {
    kind: &'static FeatureKind,
    base: BaseConfig,
    value: Option<i64>,
}

impl Manifest {
    fn new(kind: &'static FeatureKind, value: Option<i64>) -> Self {
        Self {
            kind,
            base: BaseConfig::default(),
            value,
        }
    }
}

impl Introspect for Manifest {
    fn kind(&self) -> &'static FeatureKind {
        self.kind
    }

    fn base(&self) -> &BaseConfig {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseConfig {
        &mut self.base
    }

    fn attribute(&self, _name: &str) -> Result<Option<Value>, Error> {
        Ok(self.value.map(Value::from))
    }

    fn label_groups(&self) -> Vec<Vec<String>> {
        if self.kind.attributes.is_empty() {
            return Vec::new();
        }
        vec![
            vec!["A".into(), "B".into(), "C".into()],
            vec!["DD".into(), "CC".into()],
        ]
    }
}

fn passthrough() -> InputType {
    InputType::custom("passthrough", |raw| match raw {
        RawInput::Value(v) => Ok(v.clone()),
        other => Err(Error::feature(format!("unexpected input {other:?}"))),
    })
}

fn numbers(items: &[i64]) -> Vec<RawInput> {
    items.iter().map(|i| RawInput::Value(json!(i))).collect()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn transform_after_fit_yields_constant_rows() {
    let mut feat = TestFeature1::default();
    feat.base = feat.base.with_input_type(passthrough());

    feat.fit(&numbers(&[1])).unwrap();
    let out = feat.transform(&numbers(&[1, 2, 3])).unwrap();
    assert_eq!(out.dim(), (3, 1));
    assert!(out.iter().all(|v| *v == 1.0));
}

#[test]
fn fit_transform_matches_fit_then_transform() {
    for n_jobs in [1, 2, -1] {
        let mut feat = TestFeature1::default();
        feat.base = feat.base.with_input_type(passthrough()).with_n_jobs(n_jobs);
        let out = feat.fit_transform(&numbers(&[1, 2, 3])).unwrap();
        assert_eq!(out, ndarray::array![[1.0], [1.0], [1.0]]);
    }
}

#[test]
fn transform_requires_fit() {
    let feat = TestFeature1::default();
    let err = feat.transform(&numbers(&[1])).unwrap_err();
    assert!(matches!(err, Error::NotFitted { ref attribute } if attribute == "data"));
}

// =============================================================================
// Introspection
// =============================================================================

#[test]
fn slug_lists_declared_parameters() {
    assert_eq!(
        TestFeature1::default().slugify(),
        "TestFeature1__data=None__value=None"
    );
}

#[test]
fn base_feature_params() {
    let feat = BaseFeature::new(BaseConfig::new().with_n_jobs(10));
    let params = feat.get_params();
    assert_eq!(params.len(), 2);
    assert_eq!(params["input_type"], Param::Input(InputType::List));
    assert_eq!(params["n_jobs"], Param::Int(10));
}

#[test]
fn set_params_never_adds_parameters() {
    let mut feat = BaseFeature::new(BaseConfig::new().with_n_jobs(10));
    feat.set_params([
        ("input_type", Param::from("filename")),
        ("n_jobs", Param::Int(100)),
        ("fake", Param::None),
    ])
    .unwrap();
    assert_eq!(feat.base().input_type, InputType::Filename);
    assert_eq!(feat.base().n_jobs, 100);
    assert!(!feat.get_params().contains_key("fake"));
    assert!(matches!(feat.get_param("fake"), Err(Error::UnknownParam(_))));
}

#[test]
fn labels_are_sorted_union() {
    assert_eq!(TestFeature1::default().get_labels(), vec!["A", "B", "C"]);
    assert_eq!(
        Manifest::new(&TEST_FEATURE_2, None).get_labels(),
        vec!["A", "B", "C", "CC", "DD"]
    );
    assert!(Manifest::new(&TEST_FEATURE_3, None).get_labels().is_empty());
}

#[test]
fn check_fit_follows_attribute_manifest() {
    let fitted = TestFeature1 {
        data: Param::Int(1),
        ..Default::default()
    };
    fitted.check_fit().unwrap();
    Manifest::new(&TEST_FEATURE_2, Some(1)).check_fit().unwrap();
    Manifest::new(&TEST_FEATURE_3, None).check_fit().unwrap();

    assert!(TestFeature1::default().check_fit().is_err());
    assert!(Manifest::new(&TEST_FEATURE_2, None).check_fit().is_err());
}

#[test]
fn citations_fall_back_through_parents() {
    assert_eq!(BaseFeature::default().citation(), DEFAULT_CITATION);
    assert_eq!(TestFeature1::default().citation(), "Doe, J. Nature. (2016).");

    let expected = "Doe, J. Nature. (2016).\nSmith, J. Science. (2010).";
    assert_eq!(TEST_FEATURE_2.citation(), expected);
    assert_eq!(TEST_FEATURE_3.citation(), expected);
}

#[test]
fn input_type_inherits_from_inner_transformer() {
    let inner = BaseFeature::new(BaseConfig::new().with_input_type(InputType::Filename));

    assert_eq!(
        BaseConfig::resolve_input_type(None, Some(&inner)).unwrap(),
        InputType::Filename
    );
    assert_eq!(
        BaseConfig::resolve_input_type(Some(InputType::Filename), Some(&inner)).unwrap(),
        InputType::Filename
    );
    assert!(matches!(
        BaseConfig::resolve_input_type(Some(InputType::List), Some(&inner)),
        Err(Error::InputTypeMismatch { .. })
    ));
    assert_eq!(
        BaseConfig::resolve_input_type(None, None).unwrap(),
        InputType::List
    );
}

// =============================================================================
// JSON
// =============================================================================

fn qualified(name: &str) -> String {
    format!("{}::{name}", module_path!())
}

fn unfit_document() -> Value {
    json!({
        "parameters": {"n_jobs": 1, "input_type": "list", "data": null, "value": null},
        "attributes": {"data": null},
        "transformer": qualified("TestFeature1"),
    })
}

#[test]
fn json_of_unfit_instance() {
    assert_eq!(TestFeature1::default().to_json().unwrap(), unfit_document());
}

#[test]
fn json_without_attributes() {
    let doc = Manifest::new(&TEST_FEATURE_3, None).to_json().unwrap();
    assert_eq!(
        doc,
        json!({
            "parameters": {"n_jobs": 1, "input_type": "list"},
            "attributes": {},
            "transformer": qualified("TestFeature3"),
        })
    );
}

#[test]
fn json_expands_nested_transformers() {
    let feat = TestFeature1 {
        value: Param::Feature(Arc::new(TestFeature1::default())),
        ..Default::default()
    };
    let doc = feat.to_json().unwrap();
    assert_eq!(doc["parameters"]["value"], unfit_document());
    assert_eq!(doc["attributes"], json!({"data": null}));
    assert_eq!(doc["transformer"], json!(qualified("TestFeature1")));
    assert!(feat.slugify().contains("value=TestFeature1__data=None__value=None"));
}

#[test]
fn json_rejects_custom_input_type() {
    let mut feat = TestFeature1::default();
    feat.base = feat.base.with_input_type(passthrough());
    assert!(matches!(feat.to_json(), Err(Error::Unrepresentable(_))));
}

#[test]
fn save_json_to_stream_and_path() {
    let feat = TestFeature1::default();

    let mut buf = Vec::new();
    feat.save_json(SaveTarget::Stream(&mut buf)).unwrap();
    let doc: Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(doc, unfit_document());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feature.json");
    feat.save_json(SaveTarget::Path(path.clone())).unwrap();
    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc, unfit_document());
}

// =============================================================================
// Merge strategies through fit
// =============================================================================

static SET_FEATURE: FeatureKind = FeatureKind {
    name: "SetFeature",
    module: module_path!(),
    parent: None,
    params: &[],
    attributes: &["test1", "test2"],
    references: &[],
};

#[derive(Default)]
struct SetFeature {
    base: BaseConfig,
    test1: Option<BTreeSet<i32>>,
    test2: Option<BTreeSet<i32>>,
}

impl Introspect for SetFeature {
    fn kind(&self) -> &'static FeatureKind {
        &SET_FEATURE
    }

    fn base(&self) -> &BaseConfig {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseConfig {
        &mut self.base
    }

    fn attribute(&self, name: &str) -> Result<Option<Value>, Error> {
        let slot = match name {
            "test1" => &self.test1,
            "test2" => &self.test2,
            _ => return Err(Error::UnknownAttribute(name.to_string())),
        };
        Ok(slot.as_ref().map(|s| json!(s)))
    }
}

impl Feature for SetFeature {
    type Partial = (BTreeSet<i32>, BTreeSet<i32>);
    type Merge = SetUnion;

    fn fit_one(&self, input: &Input) -> Result<Self::Partial, Error> {
        let atoms = input.molecule()?.atom_count() as i32;
        Ok(([1, 2, 3].into(), [2, 3, atoms].into()))
    }

    fn assign(&mut self, (a, b): Self::Partial) -> Result<(), Error> {
        self.test1 = Some(a);
        self.test2 = Some(b);
        Ok(())
    }

    fn transform_one(&self, _input: &Input) -> Result<Vec<f64>, Error> {
        Ok(Vec::new())
    }
}

#[test]
fn set_union_merges_tuple_partials_from_files() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/methane.xyz");
    let mut feat = SetFeature::default();
    feat.base = feat.base.with_input_type(InputType::Filename).with_n_jobs(2);
    feat.fit(&[RawInput::Path(path.clone()), RawInput::Path(path)])
        .unwrap();

    assert_eq!(feat.test1, Some([1, 2, 3].into()));
    assert_eq!(feat.test2, Some([2, 3, 5].into()));
    feat.check_fit().unwrap();
}

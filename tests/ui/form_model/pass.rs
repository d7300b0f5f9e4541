use chirper::form::{FieldKey, FieldLens, FormModel};

#[derive(Clone, chirper::form::FormModel)]
struct DemoForm {
    email: String,
    display_name: String,
}

fn main() {
    let fields = DemoForm::fields();
    let lens = fields.email();
    let mut model = DemoForm {
        email: "a@chirper.dev".to_string(),
        display_name: String::new(),
    };
    lens.set(&mut model, "b@chirper.dev".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@chirper.dev");

    assert!(model.set_value(FieldKey::new("display_name"), "chirpy".to_string()));
    assert_eq!(model.value(fields.display_name().key()), Some("chirpy"));
    assert_eq!(DemoForm::resolve_key("display_name"), Some(fields.display_name().key()));
    assert_eq!(DemoForm::field_keys().len(), 2);
}

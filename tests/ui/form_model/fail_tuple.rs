#[derive(chirper::form::FormModel)]
struct TupleForm(String);

fn main() {}

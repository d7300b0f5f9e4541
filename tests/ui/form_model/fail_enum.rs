#[derive(chirper::form::FormModel)]
enum ChoiceForm {
    Email,
    Phone,
}

fn main() {}

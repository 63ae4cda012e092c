use std::env;

fn main() {
    let base_url =
        env::var("EPICPOINTS_BASE_URL").unwrap_or_else(|_| "https://jira.example.org".to_string());
    println!("cargo:rustc-env=EPICPOINTS_BASE_URL={base_url}");
}

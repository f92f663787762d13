// build.rs

fn main() {
    // Generate build info (git values fall back to placeholders outside a checkout)
    vergen::EmitBuilder::builder()
        .all_build()
        .all_git()
        .emit()
        .expect("Unable to generate build info");
}

use shadow_rs::BuildPattern;
use shadow_rs::ShadowBuilder;

fn main() {
    // Feeds `clap`'s long version in the pacman binary.
    ShadowBuilder::builder()
        .build_pattern(BuildPattern::Lazy)
        .deny_const(Default::default())
        .build()
        .expect("Couldn't collect build metadata");
}

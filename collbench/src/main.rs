fn main() -> anyhow::Result<()> {
    collbench::run()
}

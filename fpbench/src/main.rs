fn main() -> anyhow::Result<()> {
    fpbench::run()
}

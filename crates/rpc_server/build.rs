fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the vendored protoc so builds do not depend on a system install.
    let protoc = protoc_bin_vendored::protoc_bin_path().map_err(|e| e.to_string())?;
    std::env::set_var("PROTOC", protoc);

    println!("cargo:rerun-if-changed=proto/pharmacy.proto");
    tonic_build::compile_protos("proto/pharmacy.proto")?;
    Ok(())
}

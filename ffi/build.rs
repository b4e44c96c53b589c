fn main() {
    println!("cargo:rerun-if-changed=src");
    let Ok(crate_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let Ok(out_dir) = std::env::var("OUT_DIR") else {
        return;
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("CATALOG_FFI_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(format!("{out_dir}/catalog.h"));
        }
        Err(err) => println!("cargo:warning=header not generated: {err}"),
    }
}

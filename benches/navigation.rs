use admin_registry::{AdminModule, AdminModuleRegistry, RegistryConfig, RequestingUser, Role};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

// Builds on the built-in catalog plus a batch of plugin modules so the
// per-node permission checks dominate.

fn loaded_registry(plugins: usize) -> AdminModuleRegistry {
    let mut registry = AdminModuleRegistry::new(RegistryConfig::default());
    registry.initialize();
    for i in 0..plugins {
        let module = AdminModule::new(format!("plugin-{i}"), "Plugin", format!("/admin/p/{i}"))
            .with_component("Plugin")
            .with_permissions(["dashboard.view"])
            .with_order((i % 7) as i32)
            .with_sub_module(
                AdminModule::new(format!("plugin-{i}-child"), "Child", format!("/admin/p/{i}/c"))
                    .with_component("Child")
                    .with_permissions(["users.manage"]),
            );
        registry.register(module).expect("valid plugin");
    }
    registry
}

fn navigation_benchmark(c: &mut Criterion) {
    let registry = loaded_registry(200);
    let admin = RequestingUser::new("1", Role::Admin);
    let moderator = RequestingUser::new("2", Role::Moderator);

    let mut group = c.benchmark_group("navigation");
    group.throughput(Throughput::Elements(registry.len() as u64));

    group.bench_function("admin", |b| {
        b.iter(|| registry.get_navigation_structure(black_box(Some(&admin))))
    });
    group.bench_function("moderator", |b| {
        b.iter(|| registry.get_navigation_structure(black_box(Some(&moderator))))
    });

    group.finish();
}

fn reset_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle");
    group.bench_function("reset_builtin", |b| {
        let mut registry = loaded_registry(50);
        b.iter(|| registry.reset())
    });
    group.finish();
}

criterion_group!(benches, navigation_benchmark, reset_benchmark);
criterion_main!(benches);

//! Benchmarks pour le filtrage et les statistiques

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parcelles::{filtrer, geometrie_demo, rendement_moyen_par_culture, Parcelle, Proprietes, Resume, Selection};

const CULTURES: [&str; 6] = ["maïs", "riz", "fonio", "arachide", "manioc", "sorgho"];
const REGIONS: [&str; 2] = ["Kindia", "Mamou"];

fn jeu(n: usize) -> Vec<Parcelle> {
    (0..n)
        .map(|i| Parcelle {
            culture: CULTURES[i % CULTURES.len()].to_string(),
            region: REGIONS[i % REGIONS.len()].to_string(),
            superficie: 0.5 + (i % 7) as f64 * 0.3,
            rendement_kg_ha: 500.0 + (i % 11) as f64 * 150.0,
            geometry: geometrie_demo(),
            extras: Proprietes::new(),
            membres: Proprietes::new(),
        })
        .collect()
}

fn bench_filtrer(c: &mut Criterion) {
    let selection = Selection::new(["Kindia"], ["maïs", "riz", "fonio"]);

    let mut group = c.benchmark_group("filtrer");
    for n in [100usize, 10_000] {
        let parcelles = jeu(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &parcelles, |b, parcelles| {
            b.iter(|| {
                let vue = filtrer(black_box(parcelles), &selection);
                black_box(vue.len())
            })
        });
    }
    group.finish();
}

fn bench_resume(c: &mut Criterion) {
    let parcelles = jeu(10_000);
    let vue: Vec<&Parcelle> = parcelles.iter().collect();

    c.bench_function("resume_10000", |b| {
        b.iter(|| {
            let resume = Resume::calculer(black_box(&vue));
            let moyennes = rendement_moyen_par_culture(black_box(&vue));
            black_box((resume, moyennes))
        })
    });
}

criterion_group!(benches, bench_filtrer, bench_resume);
criterion_main!(benches);

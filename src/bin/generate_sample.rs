//! Writes `sample_agreements.csv`, a synthetic export of the agreements sheet
//! for running the dashboard offline (`agreement-board --csv sample_agreements.csv`).

/// Deterministic PRNG (splitmix64); the sample only needs stable picks.
struct SimpleRng(u64);

impl SimpleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

const HEADER: [&str; 9] = [
    "Entidad",
    "Tipo de entidad",
    "Tipo de acuerdo",
    "Estado",
    "Vigencia del acuerdo",
    "Logos",
    "Tipo de información a la que la UBPD tiene acceso",
    "Quién tiene el acceso a la info",
    "¿Cómo consulto o solicito la información?",
];

const ENTITIES: [(&str, &str); 12] = [
    ("Alcaldía de Medellín", "Pública"),
    ("Gobernación del Meta", "Pública"),
    ("Instituto Nacional de Medicina Legal", "Pública"),
    ("Registraduría Nacional", "Pública"),
    ("Fiscalía General de la Nación", "Pública"),
    ("Archivo General de la Nación", "Pública"),
    ("Fundación Dignidad", "Privada"),
    ("Corporación Memoria Viva", "Privada"),
    ("Universidad del Norte", "Privada"),
    ("Cruz Roja Colombiana", "Privada"),
    ("Banco de Datos Comunitario", "Privada"),
    ("Red de Archivos Parroquiales", "Privada"),
];

fn main() {
    let mut rng = SimpleRng(42);

    let agreement_types = ["Convenio marco", "Memorando de entendimiento", "Protocolo de intercambio"];
    let statuses = ["Vigente", "En trámite", "Vencido"];
    let info = [
        "Registros civiles y documentos de identificación.",
        "Expedientes judiciales y actas de inspección.",
        "Bases de datos de personas dadas por desaparecidas.",
        "Archivos fotográficos y testimonios comunitarios.",
    ];
    let access = [
        "Equipo de investigación humanitaria.",
        "Dirección técnica de información.",
        "Enlaces territoriales designados.",
    ];
    let request = [
        "Solicitud escrita al enlace de la entidad con copia a la dirección técnica.",
        "Consulta directa en la plataforma compartida con usuario institucional.",
        "Requerimiento formal mediante oficio firmado por la subdirección.",
    ];

    let output_path = "sample_agreements.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer.write_record(HEADER).expect("Failed to write header");

    for (i, (entity, kind)) in ENTITIES.iter().enumerate() {
        let year = 2022 + (rng.next_u64() % 4);
        let validity = format!("{year}-{}", year + 1 + rng.next_u64() % 3);
        let logo = format!("https://placehold.co/140x140/png?text=E{}", i + 1);
        writer
            .write_record([
                *entity,
                *kind,
                rng.pick(&agreement_types),
                rng.pick(&statuses),
                validity.as_str(),
                logo.as_str(),
                rng.pick(&info),
                rng.pick(&access),
                rng.pick(&request),
            ])
            .expect("Failed to write record");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {} agreements to {output_path}", ENTITIES.len());
}
